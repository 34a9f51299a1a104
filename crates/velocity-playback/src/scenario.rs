//! Scenario and step definitions.
//!
//! A scenario is a fixed, ordered script of timed steps. Definitions are
//! immutable once built and are shared between the catalog and any number of
//! playback states through [`Arc`](std::sync::Arc).

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// A named demo workflow made of ordered steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Stable identifier, unique within a catalog.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Steps in playback order.
    pub steps: Vec<StepDefinition>,
}

impl ScenarioDefinition {
    /// Create a scenario with no steps.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a step.
    #[must_use]
    pub fn with_step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the scenario has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step at `index`, if any.
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    /// Index of the terminal step.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    /// Nominal running time of the whole scenario.
    #[must_use]
    pub fn total_duration_seconds(&self) -> u64 {
        self.steps
            .iter()
            .map(|s| u64::from(s.duration_seconds))
            .fold(0, u64::saturating_add)
    }

    /// Check the structural rules every catalog entry must satisfy.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first broken rule.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.id.is_empty() {
            return Err(CatalogError::EmptyScenarioId);
        }
        if self.steps.is_empty() {
            return Err(CatalogError::NoSteps {
                scenario: self.id.clone(),
            });
        }

        let mut seen = HashSet::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            if step.id.is_empty() {
                return Err(CatalogError::EmptyStepId {
                    scenario: self.id.clone(),
                    index,
                });
            }
            if step.duration_seconds == 0 {
                return Err(CatalogError::ZeroDuration {
                    scenario: self.id.clone(),
                    step: step.id.clone(),
                });
            }
            if !seen.insert(step.id.as_str()) {
                return Err(CatalogError::DuplicateStep {
                    scenario: self.id.clone(),
                    step: step.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One timed unit of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Identifier, unique within its scenario.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Nominal seconds for the progress bar to reach 100%.
    pub duration_seconds: u32,
    /// Move on by itself once complete (`true`) or hold for an explicit advance.
    pub auto_advance: bool,
    /// Illustrative data revealed once the step completes.
    pub payload: BTreeMap<String, String>,
}

impl StepDefinition {
    /// Create an auto-advancing step with an empty payload.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            duration_seconds,
            auto_advance: true,
            payload: BTreeMap::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Hold at 100% until an explicit advance.
    #[must_use]
    pub fn manual(mut self) -> Self {
        self.auto_advance = false;
        self
    }

    /// Add one payload entry.
    #[must_use]
    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}
