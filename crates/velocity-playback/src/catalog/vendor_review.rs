use crate::scenario::{ScenarioDefinition, StepDefinition};

pub(super) fn build() -> ScenarioDefinition {
    ScenarioDefinition::new("vendor-review", "New Vendor Onboarding")
        .with_description("A procurement request triggers an automated third-party risk review")
        .with_step(
            StepDefinition::new("intake", "Receive vendor request", 2)
                .with_description("Procurement submits a new analytics SaaS vendor")
                .with_payload("vendor", "Acme Analytics")
                .with_payload("data_classes", "customer PII"),
        )
        .with_step(
            StepDefinition::new("questionnaire", "Parse security questionnaire", 5)
                .with_description("Extract answers from the vendor's SIG Lite response")
                .with_payload("questions", "126")
                .with_payload("gaps", "4"),
        )
        .with_step(
            StepDefinition::new("risk-rating", "Score vendor risk", 3)
                .with_description("Weight gaps by data sensitivity and contract scope")
                .with_payload("inherent_risk", "high")
                .with_payload("residual_risk", "medium"),
        )
        .with_step(
            StepDefinition::new("approval", "Approve with conditions", 4)
                .with_description("Risk owner signs off on the remediation plan")
                .manual()
                .with_payload("conditions", "DPA addendum, annual pen test report")
                .with_payload("review_cycle", "12 months"),
        )
}
