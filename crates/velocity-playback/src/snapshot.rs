//! Read model handed to the presentation layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{PlaybackPhase, PlaybackState};

/// Point-in-time copy of everything a view renders.
///
/// Snapshots are pulled after every tick and every command; they never
/// borrow from the state that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Id of the active scenario.
    pub scenario_id: String,
    /// Title of the active scenario.
    pub scenario_title: String,
    /// Current step, `None` before the first start.
    pub current_step_index: Option<usize>,
    /// Id of the current step.
    pub current_step_id: Option<String>,
    /// Progress of the current step in `[0, 100]`.
    pub progress_percent: f64,
    /// Duration-weighted progress of the whole scenario in `[0, 100]`.
    pub overall_progress_percent: f64,
    /// Whether the clock is running.
    pub is_playing: bool,
    /// Seconds of playback since the last reset.
    pub elapsed_seconds: u64,
    /// Completion flag per step.
    pub step_completed: Vec<bool>,
    /// Step-level category.
    pub phase: PlaybackPhase,
    /// Payload of the current step once it reached 100%.
    pub revealed_payload: Option<BTreeMap<String, String>>,
}

impl PlaybackSnapshot {
    /// Capture `state`.
    #[must_use]
    pub fn from_state(state: &PlaybackState) -> Self {
        let step = state.current_step();
        let phase = state.phase();
        let revealed_payload = step
            .filter(|_| {
                matches!(
                    phase,
                    PlaybackPhase::Held | PlaybackPhase::AutoAdvancePending | PlaybackPhase::Complete
                )
            })
            .map(|s| s.payload.clone());

        Self {
            scenario_id: state.scenario().id.clone(),
            scenario_title: state.scenario().title.clone(),
            current_step_index: state.current_step_index(),
            current_step_id: step.map(|s| s.id.clone()),
            progress_percent: state.progress_percent(),
            overall_progress_percent: state.overall_progress_percent(),
            is_playing: state.is_playing(),
            elapsed_seconds: state.elapsed_seconds(),
            step_completed: state.step_completed().to_vec(),
            phase,
            revealed_payload,
        }
    }

    /// Whether the step at `current_step_index` waits for an advance.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.phase == PlaybackPhase::Held
    }

    /// Whether the scenario finished.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == PlaybackPhase::Complete
    }
}

impl From<&PlaybackState> for PlaybackSnapshot {
    fn from(state: &PlaybackState) -> Self {
        Self::from_state(state)
    }
}
