//! Scenario catalog.
//!
//! The catalog is an ordered, read-only list of scenario definitions. The
//! builtin catalog is compiled in and always valid; custom catalogs are
//! validated once at construction and never change afterwards.

mod audit_readiness;
mod evidence_sweep;
mod gdpr_transfer;
mod vendor_review;

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{CatalogError, CatalogResult};
use crate::scenario::ScenarioDefinition;

/// Ordered collection of scenarios, looked up by id.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: Vec<Arc<ScenarioDefinition>>,
}

impl ScenarioCatalog {
    /// Build a catalog from definitions, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the list is empty, a scenario id repeats,
    /// or any scenario fails [`ScenarioDefinition::validate`].
    pub fn new(scenarios: Vec<ScenarioDefinition>) -> CatalogResult<Self> {
        if scenarios.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let mut seen = HashSet::with_capacity(scenarios.len());
        for scenario in &scenarios {
            scenario.validate()?;
            if !seen.insert(scenario.id.as_str()) {
                return Err(CatalogError::DuplicateScenario(scenario.id.clone()));
            }
        }

        Ok(Self {
            scenarios: scenarios.into_iter().map(Arc::new).collect(),
        })
    }

    /// The compiled-in "Day in the Life" catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            scenarios: vec![
                Arc::new(evidence_sweep::build()),
                Arc::new(vendor_review::build()),
                Arc::new(audit_readiness::build()),
                Arc::new(gdpr_transfer::build()),
            ],
        }
    }

    /// Look up a scenario by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<ScenarioDefinition>> {
        self.scenarios.iter().find(|s| s.id == id).cloned()
    }

    /// Look up a scenario by id, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownScenario`] when no scenario has this id.
    pub fn require(&self, id: &str) -> CatalogResult<Arc<ScenarioDefinition>> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownScenario(id.to_owned()))
    }

    /// The first scenario in catalog order.
    #[must_use]
    pub fn first(&self) -> Option<Arc<ScenarioDefinition>> {
        self.scenarios.first().cloned()
    }

    /// Iterate scenarios in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ScenarioDefinition>> {
        self.scenarios.iter()
    }

    /// Scenario ids in catalog order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.id.as_str()).collect()
    }

    /// Number of scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the catalog is empty. Never true for a constructed catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::StepDefinition;

    fn one_step(id: &str) -> ScenarioDefinition {
        ScenarioDefinition::new(id, id).with_step(StepDefinition::new("only", "Only", 2))
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let builtin = ScenarioCatalog::builtin();
        let definitions: Vec<ScenarioDefinition> =
            builtin.iter().map(|s| ScenarioDefinition::clone(s)).collect();
        let rebuilt = ScenarioCatalog::new(definitions).unwrap();
        assert_eq!(rebuilt.ids(), builtin.ids());
    }

    #[test]
    fn builtin_catalog_mixes_manual_and_automatic_steps() {
        let builtin = ScenarioCatalog::builtin();
        let steps: Vec<&StepDefinition> = builtin.iter().flat_map(|s| s.steps.iter()).collect();
        assert!(steps.iter().any(|s| s.auto_advance));
        assert!(steps.iter().any(|s| !s.auto_advance));
        assert!(steps.iter().all(|s| !s.payload.is_empty()));
    }

    #[test]
    fn lookup_by_id() {
        let catalog = ScenarioCatalog::new(vec![one_step("a"), one_step("b")]).unwrap();
        assert_eq!(catalog.ids(), ["a", "b"]);
        assert_eq!(catalog.get("b").unwrap().id, "b");
        assert!(catalog.get("c").is_none());
        assert_eq!(catalog.first().unwrap().id, "a");
        assert_eq!(
            catalog.require("c").unwrap_err(),
            CatalogError::UnknownScenario("c".to_string())
        );
    }

    #[test]
    fn lookups_share_the_same_definition() {
        let catalog = ScenarioCatalog::new(vec![one_step("a")]).unwrap();
        let first = catalog.get("a").unwrap();
        let second = catalog.require("a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn duplicate_scenario_ids_are_rejected() {
        let err = ScenarioCatalog::new(vec![one_step("a"), one_step("a")]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateScenario("a".to_string()));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert_eq!(
            ScenarioCatalog::new(Vec::new()).unwrap_err(),
            CatalogError::EmptyCatalog
        );
    }

    #[test]
    fn invalid_scenario_is_rejected() {
        let broken = ScenarioDefinition::new("broken", "Broken");
        let err = ScenarioCatalog::new(vec![one_step("a"), broken]).unwrap_err();
        assert!(matches!(err, CatalogError::NoSteps { .. }));
    }
}
