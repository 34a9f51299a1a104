//! Velocity Test - Shared test utilities for the playback engine.
//!
//! This crate provides scenario fixtures and test helpers that can be used
//! across Velocity crates as a dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! velocity-test.workspace = true
//! ```
//!
//! Then use in integration tests:
//!
//! ```rust,ignore
//! use velocity_playback::{PlaybackEvent, PlaybackState};
//! use velocity_test::{mixed_two_step_scenario, tick_n};
//!
//! #[test]
//! fn plays_first_step() {
//!     let mut state = PlaybackState::new(mixed_two_step_scenario());
//!     state.apply(PlaybackEvent::Start);
//!     tick_n(&mut state, 5);
//!     assert_eq!(state.current_step_index(), Some(1));
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
