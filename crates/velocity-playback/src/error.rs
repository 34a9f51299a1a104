//! Error types for catalog construction and the playback driver.

use thiserror::Error;

/// Errors raised while building or querying a scenario catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A scenario was defined with an empty identifier.
    #[error("scenario id must not be empty")]
    EmptyScenarioId,

    /// A scenario has no steps.
    #[error("scenario '{scenario}' has no steps")]
    NoSteps {
        /// The offending scenario id.
        scenario: String,
    },

    /// A step was defined with an empty identifier.
    #[error("scenario '{scenario}' has a step with an empty id at position {index}")]
    EmptyStepId {
        /// The scenario containing the step.
        scenario: String,
        /// Position of the step in the scenario.
        index: usize,
    },

    /// A step has a zero duration.
    #[error("step '{step}' in scenario '{scenario}' has a zero duration")]
    ZeroDuration {
        /// The scenario containing the step.
        scenario: String,
        /// The offending step id.
        step: String,
    },

    /// Two steps in one scenario share an identifier.
    #[error("scenario '{scenario}' defines step '{step}' more than once")]
    DuplicateStep {
        /// The scenario containing the steps.
        scenario: String,
        /// The repeated step id.
        step: String,
    },

    /// Two scenarios in one catalog share an identifier.
    #[error("catalog defines scenario '{0}' more than once")]
    DuplicateScenario(String),

    /// A catalog was built with no scenarios.
    #[error("catalog must contain at least one scenario")]
    EmptyCatalog,

    /// Lookup of an id the catalog does not contain.
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by a [`PlaybackHandle`](crate::PlaybackHandle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The driver task has stopped and no longer accepts commands.
    #[error("playback driver is not running")]
    DriverClosed,
}

/// Result type for driver operations.
pub type PlaybackResult<T> = Result<T, PlaybackError>;
