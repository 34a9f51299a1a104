//! Inputs to the playback reducer and the transitions they produce.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::scenario::ScenarioDefinition;

/// Everything that can change a [`PlaybackState`](crate::PlaybackState).
///
/// Presentation commands and clock events share one type so that a single
/// transition function is the only mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Replace the active scenario and return to the pre-start state.
    Select(Arc<ScenarioDefinition>),
    /// Begin or resume tick-driven advancement.
    Start,
    /// Freeze progress and elapsed time.
    Pause,
    /// Return to the pre-start state of the active scenario.
    Reset,
    /// Leave a held step for the next one.
    Advance,
    /// One fixed clock interval elapsed.
    Tick,
    /// The cosmetic delay after an auto-advancing step finished.
    AutoAdvanceElapsed {
        /// The completed step the delay was armed for.
        step_index: usize,
    },
}

impl PlaybackEvent {
    /// Short name used in log fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Reset => "reset",
            Self::Advance => "advance",
            Self::Tick => "tick",
            Self::AutoAdvanceElapsed { .. } => "auto_advance_elapsed",
        }
    }

    /// Whether this event comes from the clock rather than the presentation layer.
    #[must_use]
    pub fn is_clock(&self) -> bool {
        matches!(self, Self::Tick | Self::AutoAdvanceElapsed { .. })
    }
}

/// What an event did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// Preconditions did not hold; state is unchanged.
    Ignored,
    /// Counters or the playing flag changed within the same step.
    Updated,
    /// Returned to the not-started state.
    Reset,
    /// Playback moved onto a step with zero progress.
    StepEntered {
        /// The step now current.
        index: usize,
    },
    /// A manual step reached 100% and waits for an advance.
    StepHeld {
        /// The held step.
        index: usize,
    },
    /// An automatic step reached 100% and waits out the cosmetic delay.
    AutoAdvancePending {
        /// The completed step.
        index: usize,
    },
    /// The terminal step reached 100%; playback stopped.
    ScenarioComplete,
}

impl Transition {
    /// Whether the event was absorbed as a no-op.
    #[must_use]
    pub fn is_ignored(self) -> bool {
        matches!(self, Self::Ignored)
    }
}
