//! Scenario fixtures.

use std::sync::Arc;

use velocity_playback::{ScenarioDefinition, StepDefinition};

/// Build a scenario from `(duration_seconds, auto_advance)` pairs.
///
/// Steps are named `step-0`, `step-1`, … and carry a single `index` payload
/// entry.
#[must_use]
pub fn test_scenario(id: &str, steps: &[(u32, bool)]) -> Arc<ScenarioDefinition> {
    let scenario = steps
        .iter()
        .enumerate()
        .fold(ScenarioDefinition::new(id, id), |scenario, (i, (duration, auto))| {
            let step = StepDefinition::new(format!("step-{i}"), format!("Step {i}"), *duration)
                .with_payload("index", i.to_string());
            scenario.with_step(if *auto { step } else { step.manual() })
        });
    Arc::new(scenario)
}

/// Two steps of 5 s and 3 s; the first advances on its own, the second is manual.
#[must_use]
pub fn mixed_two_step_scenario() -> Arc<ScenarioDefinition> {
    test_scenario("mixed-two-step", &[(5, true), (3, false)])
}

/// A scenario whose every step advances on its own.
#[must_use]
pub fn all_auto_scenario(durations: &[u32]) -> Arc<ScenarioDefinition> {
    let steps: Vec<(u32, bool)> = durations.iter().map(|d| (*d, true)).collect();
    test_scenario("all-auto", &steps)
}

/// A scenario whose every step holds for an explicit advance.
#[must_use]
pub fn all_manual_scenario(durations: &[u32]) -> Arc<ScenarioDefinition> {
    let steps: Vec<(u32, bool)> = durations.iter().map(|d| (*d, false)).collect();
    test_scenario("all-manual", &steps)
}
