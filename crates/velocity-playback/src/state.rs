//! Playback state and its transition function.
//!
//! [`PlaybackState`] is a plain value with no timers attached. Every change
//! goes through [`PlaybackState::apply`], so the whole state machine can be
//! driven step by step in tests and by any clock in production (see
//! [`PlaybackDriver`](crate::PlaybackDriver)).
//!
//! Progress is kept as whole ticks spent on the current step. The percentage
//! is derived from it, which keeps a three-second step at exactly 100% after
//! three ticks instead of accumulating `33.33…` three times.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::event::{PlaybackEvent, Transition};
use crate::scenario::{ScenarioDefinition, StepDefinition};
use crate::snapshot::PlaybackSnapshot;

/// How an automatic step hands over to the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePacing {
    /// Enter the next step on the same tick that completes the current one.
    #[default]
    Immediate,
    /// Hold at 100% until an [`PlaybackEvent::AutoAdvanceElapsed`] arrives.
    Deferred,
}

/// Step-level category of the state, independent of the playing flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    /// No step has been entered yet.
    NotStarted,
    /// The current step is below 100%.
    InProgress,
    /// An automatic step is at 100% and the next step is about to start.
    AutoAdvancePending,
    /// A manual step is at 100% and waits for an advance.
    Held,
    /// The terminal step reached 100%.
    Complete,
}

/// Mutable playback state for one demo view.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    scenario: Arc<ScenarioDefinition>,
    current_step: Option<usize>,
    step_ticks: u32,
    is_playing: bool,
    elapsed_seconds: u64,
    step_completed: Vec<bool>,
    pending_auto_advance: bool,
    pacing: AdvancePacing,
}

impl PlaybackState {
    /// A not-started state with [`AdvancePacing::Immediate`].
    #[must_use]
    pub fn new(scenario: Arc<ScenarioDefinition>) -> Self {
        Self::with_pacing(scenario, AdvancePacing::Immediate)
    }

    /// A not-started state with the given pacing.
    #[must_use]
    pub fn with_pacing(scenario: Arc<ScenarioDefinition>, pacing: AdvancePacing) -> Self {
        let step_completed = vec![false; scenario.len()];
        Self {
            scenario,
            current_step: None,
            step_ticks: 0,
            is_playing: false,
            elapsed_seconds: 0,
            step_completed,
            pending_auto_advance: false,
            pacing,
        }
    }

    /// The active scenario.
    #[must_use]
    pub fn scenario(&self) -> &Arc<ScenarioDefinition> {
        &self.scenario
    }

    /// Index of the current step, `None` before the first start.
    #[must_use]
    pub fn current_step_index(&self) -> Option<usize> {
        self.current_step
    }

    /// Definition of the current step.
    #[must_use]
    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.current_step.and_then(|i| self.scenario.step(i))
    }

    /// Progress of the current step in `[0, 100]`.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        let Some(step) = self.current_step() else {
            return 0.0;
        };
        if self.current_step_completed() {
            100.0
        } else if step.duration_seconds == 0 {
            0.0
        } else {
            f64::from(self.step_ticks) * 100.0 / f64::from(step.duration_seconds)
        }
    }

    /// Progress across the whole scenario in `[0, 100]`, weighted by duration.
    #[must_use]
    pub fn overall_progress_percent(&self) -> f64 {
        let total = self.scenario.total_duration_seconds();
        if total == 0 {
            return 0.0;
        }

        let done = self
            .scenario
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                if self.step_completed.get(index).copied().unwrap_or(false) {
                    u64::from(step.duration_seconds)
                } else if self.current_step == Some(index) {
                    u64::from(self.step_ticks)
                } else {
                    0
                }
            })
            .fold(0, u64::saturating_add);

        #[allow(clippy::cast_precision_loss)]
        let percent = done as f64 * 100.0 / total as f64;
        percent.min(100.0)
    }

    /// Whether ticks currently advance the state.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Ticks applied while playing since the last reset.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Completion flag per step, in catalog order.
    #[must_use]
    pub fn step_completed(&self) -> &[bool] {
        &self.step_completed
    }

    /// The configured pacing.
    #[must_use]
    pub fn pacing(&self) -> AdvancePacing {
        self.pacing
    }

    /// The completed step waiting out its cosmetic delay, if any.
    #[must_use]
    pub fn pending_auto_advance(&self) -> Option<usize> {
        self.current_step.filter(|_| self.pending_auto_advance)
    }

    /// Step-level category of the state.
    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        let (Some(index), Some(step)) = (self.current_step, self.current_step()) else {
            return PlaybackPhase::NotStarted;
        };
        if !self.current_step_completed() {
            PlaybackPhase::InProgress
        } else if self.scenario.last_index() == Some(index) {
            PlaybackPhase::Complete
        } else if step.auto_advance {
            PlaybackPhase::AutoAdvancePending
        } else {
            PlaybackPhase::Held
        }
    }

    /// Whether the terminal step reached 100%.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase() == PlaybackPhase::Complete
    }

    /// Read model for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot::from_state(self)
    }

    /// Apply one event. This is the only path that mutates the state.
    pub fn apply(&mut self, event: PlaybackEvent) -> Transition {
        let name = event.name();
        let clock = event.is_clock();
        let transition = match event {
            PlaybackEvent::Select(scenario) => self.select(scenario),
            PlaybackEvent::Start => self.start(),
            PlaybackEvent::Pause => self.pause(),
            PlaybackEvent::Reset => self.reset(),
            PlaybackEvent::Advance => self.advance(),
            PlaybackEvent::Tick => self.tick(),
            PlaybackEvent::AutoAdvanceElapsed { step_index } => {
                self.auto_advance_elapsed(step_index)
            },
        };

        match transition {
            Transition::Ignored | Transition::Updated if clock => {
                trace!(scenario = %self.scenario.id, event = name, ?transition, elapsed = self.elapsed_seconds, "clock event");
            },
            Transition::Ignored => {
                debug!(scenario = %self.scenario.id, event = name, phase = ?self.phase(), "command ignored");
            },
            Transition::ScenarioComplete => {
                info!(scenario = %self.scenario.id, elapsed = self.elapsed_seconds, "scenario complete");
            },
            _ => {
                debug!(scenario = %self.scenario.id, event = name, ?transition, "playback transition");
            },
        }

        transition
    }

    /// Replace the scenario and return to the not-started state.
    pub fn select(&mut self, scenario: Arc<ScenarioDefinition>) -> Transition {
        *self = Self::with_pacing(scenario, self.pacing);
        Transition::Reset
    }

    /// Enter the first step if needed and begin advancing on ticks.
    ///
    /// Idempotent while playing. Once complete, only a reset or a new
    /// selection leaves the terminal state.
    pub fn start(&mut self) -> Transition {
        if self.is_playing || self.is_complete() || self.scenario.steps.is_empty() {
            return Transition::Ignored;
        }
        self.is_playing = true;
        if self.current_step.is_none() {
            self.enter_step(0);
            return Transition::StepEntered { index: 0 };
        }
        Transition::Updated
    }

    /// Stop advancing. Progress and elapsed time keep their values.
    pub fn pause(&mut self) -> Transition {
        if !self.is_playing {
            return Transition::Ignored;
        }
        self.is_playing = false;
        Transition::Updated
    }

    /// Same as selecting the current scenario again.
    pub fn reset(&mut self) -> Transition {
        let scenario = Arc::clone(&self.scenario);
        self.select(scenario)
    }

    /// Leave a held step. A no-op in every other phase.
    pub fn advance(&mut self) -> Transition {
        let Some(index) = self.current_step else {
            return Transition::Ignored;
        };
        if self.phase() != PlaybackPhase::Held {
            return Transition::Ignored;
        }
        let next = index.saturating_add(1);
        self.enter_step(next);
        Transition::StepEntered { index: next }
    }

    /// Advance the clock by one interval.
    pub fn tick(&mut self) -> Transition {
        if !self.is_playing {
            return Transition::Ignored;
        }
        let Some(index) = self.current_step else {
            return Transition::Ignored;
        };
        let Some((duration, auto_advance)) = self
            .scenario
            .step(index)
            .map(|s| (s.duration_seconds, s.auto_advance))
        else {
            return Transition::Ignored;
        };

        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);

        // Held or pending: only the clock moves.
        if self.current_step_completed() {
            return Transition::Updated;
        }

        // A zero-length step completes on its first tick.
        if self.step_ticks < duration {
            self.step_ticks = self.step_ticks.saturating_add(1);
        }
        if self.step_ticks < duration {
            return Transition::Updated;
        }

        if let Some(flag) = self.step_completed.get_mut(index) {
            *flag = true;
        }

        let next = index
            .checked_add(1)
            .filter(|next| *next < self.scenario.len());
        match next {
            None => {
                self.is_playing = false;
                Transition::ScenarioComplete
            },
            Some(next) if auto_advance => match self.pacing {
                AdvancePacing::Immediate => {
                    self.enter_step(next);
                    Transition::StepEntered { index: next }
                },
                AdvancePacing::Deferred => {
                    self.pending_auto_advance = true;
                    Transition::AutoAdvancePending { index }
                },
            },
            Some(_) => Transition::StepHeld { index },
        }
    }

    /// Finish a deferred auto-advance armed for `step_index`.
    ///
    /// Stale events (after a reset, selection or pause) are ignored.
    pub fn auto_advance_elapsed(&mut self, step_index: usize) -> Transition {
        if !self.is_playing || self.pending_auto_advance() != Some(step_index) {
            return Transition::Ignored;
        }
        let next = step_index.saturating_add(1);
        self.enter_step(next);
        Transition::StepEntered { index: next }
    }

    fn current_step_completed(&self) -> bool {
        self.current_step
            .and_then(|i| self.step_completed.get(i))
            .copied()
            .unwrap_or(false)
    }

    fn enter_step(&mut self, index: usize) {
        self.current_step = Some(index);
        self.step_ticks = 0;
        self.pending_auto_advance = false;
    }
}

/// Functional form of [`PlaybackState::apply`].
#[must_use]
pub fn reduce(mut state: PlaybackState, event: PlaybackEvent) -> PlaybackState {
    state.apply(event);
    state
}
