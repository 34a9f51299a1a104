//! Prelude module - commonly used types for convenient import.
//!
//! Use `use velocity_playback::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use velocity_playback::prelude::*;
//!
//! let scenario = ScenarioCatalog::builtin().first().unwrap();
//! let mut state = PlaybackState::new(scenario);
//! assert_eq!(state.apply(PlaybackEvent::Advance), Transition::Ignored);
//! assert_eq!(state.phase(), PlaybackPhase::NotStarted);
//! ```

// Errors
pub use crate::{CatalogError, CatalogResult, PlaybackError, PlaybackResult};

// Definitions
pub use crate::{ScenarioCatalog, ScenarioDefinition, StepDefinition};

// State machine
pub use crate::{AdvancePacing, PlaybackEvent, PlaybackPhase, PlaybackState, Transition};

// Read model
pub use crate::PlaybackSnapshot;

// Driver
pub use crate::{DriverConfig, PlaybackDriver, PlaybackHandle};
