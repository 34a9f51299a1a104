use crate::scenario::{ScenarioDefinition, StepDefinition};

pub(super) fn build() -> ScenarioDefinition {
    ScenarioDefinition::new("gdpr-transfer", "GDPR Transfer Check")
        .with_description("A new sub-processor outside the EEA is screened before go-live")
        .with_step(
            StepDefinition::new("data-flow", "Trace data flow", 3)
                .with_description("Identify which personal data leaves the EEA")
                .with_payload("destination", "United States")
                .with_payload("categories", "contact details, usage events"),
        )
        .with_step(
            StepDefinition::new("mechanism", "Check transfer mechanism", 4)
                .with_description("Confirm SCCs and the Data Privacy Framework certification")
                .with_payload("mechanism", "SCC module 2")
                .with_payload("dpf_certified", "yes"),
        )
        .with_step(
            StepDefinition::new("tia", "Draft transfer impact assessment", 5)
                .with_description("Summarise local-law risk and supplementary measures")
                .manual()
                .with_payload("risk", "low")
                .with_payload("measures", "encryption at rest, EU-held keys"),
        )
        .with_step(
            StepDefinition::new("record", "Update records of processing", 2)
                .with_description("Add the sub-processor to the Article 30 register")
                .with_payload("register_entries", "42")
                .with_payload("notified", "DPO"),
        )
}
