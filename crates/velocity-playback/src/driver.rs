//! Timer loop around [`PlaybackState`].
//!
//! A driver task owns the state exclusively. Presentation commands arrive on
//! one channel and are applied in order together with clock ticks, so there
//! is never more than one mutator. Each command is acknowledged only after it
//! has been applied, which means that once `pause().await` (or `reset`,
//! `select`) returns, no tick scheduled before the call can touch the state.
//!
//! The periodic interval is only polled while playing and is reset whenever
//! playback (re)starts. The cosmetic auto-advance delay is a deadline that
//! exists only while a deferred hand-over is pending and playback runs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{Instrument, debug};

use crate::error::{PlaybackError, PlaybackResult};
use crate::event::PlaybackEvent;
use crate::scenario::ScenarioDefinition;
use crate::snapshot::PlaybackSnapshot;
use crate::state::{AdvancePacing, PlaybackState};

/// Default interval between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Default cosmetic pause between an automatic step and the next.
pub const DEFAULT_AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(500);

/// Default command channel capacity.
pub const DEFAULT_COMMAND_BUFFER: usize = 32;

/// Timing knobs for a [`PlaybackDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Interval between ticks. One tick is one second of nominal step time.
    pub tick_interval: Duration,
    /// Pause after an automatic step reaches 100%. Zero hands over on the
    /// completing tick.
    pub auto_advance_delay: Duration,
    /// Capacity of the command channel.
    pub command_buffer: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            auto_advance_delay: DEFAULT_AUTO_ADVANCE_DELAY,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

impl DriverConfig {
    /// Set the tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the auto-advance delay.
    #[must_use]
    pub fn with_auto_advance_delay(mut self, delay: Duration) -> Self {
        self.auto_advance_delay = delay;
        self
    }

    /// Pacing implied by the delay.
    #[must_use]
    pub fn pacing(&self) -> AdvancePacing {
        if self.auto_advance_delay.is_zero() {
            AdvancePacing::Immediate
        } else {
            AdvancePacing::Deferred
        }
    }
}

/// A command waiting to be applied, with its acknowledgement channel.
#[derive(Debug)]
struct Request {
    event: PlaybackEvent,
    reply: oneshot::Sender<PlaybackSnapshot>,
}

/// Owns a [`PlaybackState`] and drives it from a tokio clock.
pub struct PlaybackDriver {
    state: PlaybackState,
    config: DriverConfig,
    commands: mpsc::Receiver<Request>,
    snapshots: watch::Sender<PlaybackSnapshot>,
    /// Step awaiting its hand-over, and when the delay ends.
    auto_advance_deadline: Option<(usize, Instant)>,
}

impl PlaybackDriver {
    /// Spawn a driver for `scenario` on the current tokio runtime.
    ///
    /// The task runs inside the caller's current span.
    ///
    /// The scenario starts in the not-started state; call
    /// [`PlaybackHandle::start`] to begin.
    #[must_use]
    pub fn spawn(scenario: Arc<ScenarioDefinition>, config: DriverConfig) -> PlaybackHandle {
        let state = PlaybackState::with_pacing(scenario, config.pacing());
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

        let driver = Self {
            state,
            config,
            commands: command_rx,
            snapshots: snapshot_tx,
            auto_advance_deadline: None,
        };
        let task = tokio::spawn(driver.run().in_current_span());

        PlaybackHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task: Some(task),
        }
    }

    async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            scenario = %self.state.scenario().id,
            tick_ms = self.config.tick_interval.as_millis(),
            delay_ms = self.config.auto_advance_delay.as_millis(),
            "Playback driver started"
        );

        loop {
            let playing = self.state.is_playing();
            let pending = self.auto_advance_deadline;
            let (pending_step, wake_at) = pending.unwrap_or((0, Instant::now()));

            tokio::select! {
                biased;
                request = self.commands.recv() => {
                    let Some(request) = request else {
                        break;
                    };
                    let was_playing = self.state.is_playing();
                    self.state.apply(request.event);
                    if !was_playing && self.state.is_playing() {
                        ticker.reset();
                    }
                    let snapshot = self.settle();
                    // The caller may have stopped waiting; the state is applied regardless.
                    let _ = request.reply.send(snapshot);
                }
                _ = ticker.tick(), if playing => {
                    self.state.apply(PlaybackEvent::Tick);
                    self.settle();
                }
                () = tokio::time::sleep_until(wake_at), if pending.is_some() => {
                    self.auto_advance_deadline = None;
                    self.state.apply(PlaybackEvent::AutoAdvanceElapsed { step_index: pending_step });
                    self.settle();
                }
            }
        }

        debug!(scenario = %self.state.scenario().id, "Playback driver stopped");
    }

    /// Re-arm or disarm the auto-advance deadline and publish a snapshot.
    fn settle(&mut self) -> PlaybackSnapshot {
        let pending = self
            .state
            .pending_auto_advance()
            .filter(|_| self.state.is_playing());

        match pending {
            Some(step) if self.auto_advance_deadline.map(|(s, _)| s) != Some(step) => {
                let now = Instant::now();
                let at = now
                    .checked_add(self.config.auto_advance_delay)
                    .unwrap_or(now);
                self.auto_advance_deadline = Some((step, at));
            },
            Some(_) => {},
            None => self.auto_advance_deadline = None,
        }

        let snapshot = self.state.snapshot();
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }
}

/// Presentation-side handle to a running [`PlaybackDriver`].
///
/// Dropping the handle stops the driver and its timers.
#[derive(Debug)]
pub struct PlaybackHandle {
    commands: mpsc::Sender<Request>,
    snapshots: watch::Receiver<PlaybackSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl PlaybackHandle {
    /// Apply `event` and return the snapshot right after it.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::DriverClosed`] if the driver has stopped.
    pub async fn send(&self, event: PlaybackEvent) -> PlaybackResult<PlaybackSnapshot> {
        let (reply, ack) = oneshot::channel();
        self.commands
            .send(Request { event, reply })
            .await
            .map_err(|_| PlaybackError::DriverClosed)?;
        ack.await.map_err(|_| PlaybackError::DriverClosed)
    }

    /// Switch to another scenario, cancelling any running timer.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::DriverClosed`] if the driver has stopped.
    pub async fn select(
        &self,
        scenario: Arc<ScenarioDefinition>,
    ) -> PlaybackResult<PlaybackSnapshot> {
        self.send(PlaybackEvent::Select(scenario)).await
    }

    /// Begin or resume playback.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::DriverClosed`] if the driver has stopped.
    pub async fn start(&self) -> PlaybackResult<PlaybackSnapshot> {
        self.send(PlaybackEvent::Start).await
    }

    /// Pause playback.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::DriverClosed`] if the driver has stopped.
    pub async fn pause(&self) -> PlaybackResult<PlaybackSnapshot> {
        self.send(PlaybackEvent::Pause).await
    }

    /// Return to the pre-start state of the current scenario.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::DriverClosed`] if the driver has stopped.
    pub async fn reset(&self) -> PlaybackResult<PlaybackSnapshot> {
        self.send(PlaybackEvent::Reset).await
    }

    /// Leave a held step.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::DriverClosed`] if the driver has stopped.
    pub async fn advance(&self) -> PlaybackResult<PlaybackSnapshot> {
        self.send(PlaybackEvent::Advance).await
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified whenever a new snapshot is published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        let mut receiver = self.snapshots.clone();
        receiver.mark_unchanged();
        receiver
    }

    /// Whether the driver task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the driver and wait until its task has ended.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::StepDefinition;
    use crate::state::PlaybackPhase;

    fn scenario(id: &str, steps: &[(u32, bool)]) -> Arc<ScenarioDefinition> {
        let mut scenario = ScenarioDefinition::new(id, id);
        for (i, (duration, auto)) in steps.iter().enumerate() {
            let mut step = StepDefinition::new(format!("step-{i}"), format!("Step {i}"), *duration)
                .with_payload("index", i.to_string());
            step.auto_advance = *auto;
            scenario = scenario.with_step(step);
        }
        Arc::new(scenario)
    }

    fn immediate() -> DriverConfig {
        DriverConfig::default().with_auto_advance_delay(Duration::ZERO)
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn pacing_follows_delay() {
        assert_eq!(DriverConfig::default().pacing(), AdvancePacing::Deferred);
        assert_eq!(immediate().pacing(), AdvancePacing::Immediate);
    }

    #[tokio::test(start_paused = true)]
    async fn plays_on_the_clock() {
        let handle = PlaybackDriver::spawn(scenario("a", &[(2, true), (2, false)]), immediate());
        assert_eq!(handle.snapshot().phase, PlaybackPhase::NotStarted);

        let snap = handle.start().await.unwrap();
        assert_eq!(snap.current_step_index, Some(0));
        assert!(snap.is_playing);

        sleep_ms(2_500).await;
        let snap = handle.snapshot();
        assert_eq!(snap.current_step_index, Some(1));
        assert!(snap.progress_percent.abs() < f64::EPSILON);
        assert_eq!(snap.step_completed, [true, false]);

        sleep_ms(2_000).await;
        let snap = handle.snapshot();
        assert!(snap.is_complete());
        assert!(!snap.is_playing);
        assert_eq!(snap.elapsed_seconds, 4);

        sleep_ms(5_000).await;
        assert_eq!(handle.snapshot().elapsed_seconds, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_the_clock() {
        let handle = PlaybackDriver::spawn(scenario("a", &[(4, true)]), immediate());
        handle.start().await.unwrap();
        sleep_ms(1_500).await;

        let paused = handle.pause().await.unwrap();
        assert!(!paused.is_playing);
        assert!((paused.progress_percent - 25.0).abs() < 1e-9);
        assert_eq!(paused.elapsed_seconds, 1);

        sleep_ms(10_000).await;
        assert_eq!(handle.snapshot(), paused);

        // Resuming does not fire an immediate catch-up tick.
        let resumed = handle.start().await.unwrap();
        assert_eq!(resumed.elapsed_seconds, 1);
        sleep_ms(500).await;
        assert_eq!(handle.snapshot().elapsed_seconds, 1);
        sleep_ms(700).await;
        let snap = handle.snapshot();
        assert_eq!(snap.elapsed_seconds, 2);
        assert!((snap.progress_percent - 50.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_hand_over_waits_for_delay() {
        let config = DriverConfig::default().with_auto_advance_delay(Duration::from_millis(500));
        let handle = PlaybackDriver::spawn(scenario("a", &[(1, true), (1, true)]), config);
        handle.start().await.unwrap();

        sleep_ms(1_250).await;
        let snap = handle.snapshot();
        assert_eq!(snap.phase, PlaybackPhase::AutoAdvancePending);
        assert_eq!(snap.current_step_index, Some(0));
        assert!((snap.progress_percent - 100.0).abs() < f64::EPSILON);
        assert_eq!(snap.revealed_payload.unwrap()["index"], "0");

        sleep_ms(500).await;
        let snap = handle.snapshot();
        assert_eq!(snap.current_step_index, Some(1));
        assert_eq!(snap.phase, PlaybackPhase::InProgress);

        sleep_ms(500).await;
        assert!(handle.snapshot().is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn held_step_resumes_on_advance() {
        let handle = PlaybackDriver::spawn(scenario("a", &[(1, false), (1, true)]), immediate());
        handle.start().await.unwrap();
        sleep_ms(3_500).await;

        let snap = handle.snapshot();
        assert!(snap.can_advance());
        assert!(snap.is_playing);
        assert_eq!(snap.elapsed_seconds, 3);

        let snap = handle.advance().await.unwrap();
        assert_eq!(snap.current_step_index, Some(1));
        sleep_ms(1_100).await;
        assert!(handle.snapshot().is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn select_cancels_pending_ticks() {
        let handle = PlaybackDriver::spawn(scenario("a", &[(3, true), (3, true)]), immediate());
        handle.start().await.unwrap();
        sleep_ms(1_500).await;

        let snap = handle.select(scenario("b", &[(2, true)])).await.unwrap();
        assert_eq!(snap.scenario_id, "b");
        assert_eq!(snap.current_step_index, None);
        assert_eq!(snap.elapsed_seconds, 0);

        sleep_ms(5_000).await;
        assert_eq!(handle.snapshot(), snap);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_disarms_auto_advance_delay() {
        let config = DriverConfig::default().with_auto_advance_delay(Duration::from_millis(500));
        let handle = PlaybackDriver::spawn(scenario("a", &[(1, true), (1, true)]), config);
        handle.start().await.unwrap();
        sleep_ms(1_250).await;
        assert_eq!(handle.snapshot().phase, PlaybackPhase::AutoAdvancePending);

        let snap = handle.reset().await.unwrap();
        assert_eq!(snap.phase, PlaybackPhase::NotStarted);
        sleep_ms(2_000).await;
        assert_eq!(handle.snapshot(), snap);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_during_delay_restarts_it_on_resume() {
        let config = DriverConfig::default().with_auto_advance_delay(Duration::from_millis(500));
        let handle = PlaybackDriver::spawn(scenario("a", &[(1, true), (5, true)]), config);
        handle.start().await.unwrap();
        sleep_ms(1_250).await;
        handle.pause().await.unwrap();

        sleep_ms(3_000).await;
        assert_eq!(handle.snapshot().current_step_index, Some(0));

        handle.start().await.unwrap();
        sleep_ms(250).await;
        assert_eq!(handle.snapshot().current_step_index, Some(0));
        sleep_ms(500).await;
        assert_eq!(handle.snapshot().current_step_index, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_each_tick() {
        let handle = PlaybackDriver::spawn(scenario("a", &[(3, true)]), immediate());
        let mut rx = handle.subscribe();
        handle.start().await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().elapsed_seconds, 0);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().elapsed_seconds, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_driver() {
        let handle = PlaybackDriver::spawn(scenario("a", &[(3, true)]), immediate());
        let mut rx = handle.subscribe();
        assert!(handle.is_running());
        drop(handle);
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_the_task() {
        let handle = PlaybackDriver::spawn(scenario("a", &[(3, true)]), immediate());
        let mut rx = handle.subscribe();
        handle.start().await.unwrap();
        handle.shutdown().await;
        assert!(rx.changed().await.is_err());
    }
}
