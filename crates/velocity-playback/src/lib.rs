//! Velocity Playback - scenario playback engine for the "Day in the Life" demo.
//!
//! This crate provides:
//! - A static [`ScenarioCatalog`] of timed, ordered demo scenarios
//! - [`PlaybackState`], a pure state machine advanced one event at a time
//! - [`PlaybackDriver`], a tokio task that ticks the state on a fixed interval
//! - [`PlaybackSnapshot`], the read model a presentation layer renders
//!
//! # Example
//!
//! ```rust
//! use velocity_playback::{PlaybackEvent, PlaybackState, ScenarioCatalog};
//!
//! let catalog = ScenarioCatalog::builtin();
//! let scenario = catalog.require("vendor-review").unwrap();
//! let mut state = PlaybackState::new(scenario);
//!
//! state.apply(PlaybackEvent::Start);
//! state.apply(PlaybackEvent::Tick);
//!
//! let snapshot = state.snapshot();
//! assert_eq!(snapshot.current_step_index, Some(0));
//! assert!(snapshot.progress_percent > 0.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod catalog;
mod driver;
mod error;
mod event;
mod scenario;
mod snapshot;
mod state;

pub use catalog::ScenarioCatalog;
pub use driver::{
    DEFAULT_AUTO_ADVANCE_DELAY, DEFAULT_COMMAND_BUFFER, DEFAULT_TICK_INTERVAL, DriverConfig,
    PlaybackDriver, PlaybackHandle,
};
pub use error::{CatalogError, CatalogResult, PlaybackError, PlaybackResult};
pub use event::{PlaybackEvent, Transition};
pub use scenario::{ScenarioDefinition, StepDefinition};
pub use snapshot::PlaybackSnapshot;
pub use state::{AdvancePacing, PlaybackPhase, PlaybackState, reduce};
