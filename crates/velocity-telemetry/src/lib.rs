//! Velocity Telemetry - logging and session correlation for the demo.
//!
//! This crate provides:
//! - [`LogConfig`] and [`setup_logging`], a `tracing-subscriber` setup with
//!   several output formats and targets
//! - [`SessionContext`], a span carrying the id of one demo playthrough
//!
//! # Example
//!
//! ```rust,no_run
//! use velocity_telemetry::{LogConfig, LogFormat, SessionContext, SessionGuard, setup_logging};
//!
//! # fn main() -> Result<(), velocity_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("velocity_playback=debug");
//! setup_logging(&config)?;
//!
//! let session = SessionGuard::new(SessionContext::new("cli").with_scenario("evidence-sweep"));
//! session.span().in_scope(|| tracing::info!("Presenting"));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

#[cfg(feature = "config")]
mod bridge;
mod error;
mod logging;
mod session;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
pub use session::{SessionContext, SessionGuard};
