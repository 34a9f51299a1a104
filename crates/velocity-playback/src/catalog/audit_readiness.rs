use crate::scenario::{ScenarioDefinition, StepDefinition};

pub(super) fn build() -> ScenarioDefinition {
    ScenarioDefinition::new("audit-readiness", "Audit Readiness Check")
        .with_description("Two weeks before fieldwork, the team assembles the ISAE 3000 package")
        .with_step(
            StepDefinition::new("control-map", "Map controls to framework", 4)
                .with_description("Cross-walk internal controls to ISAE 3000 and SOC 2 criteria")
                .with_payload("controls", "84")
                .with_payload("frameworks", "ISAE 3000, SOC 2")
                .with_payload("unmapped", "1"),
        )
        .with_step(
            StepDefinition::new("gap-review", "Review open gaps", 3)
                .with_description("Walk the auditor liaison through the single unmapped control")
                .manual()
                .with_payload("gap", "Quarterly access review evidence for Q2")
                .with_payload("owner", "IT Operations"),
        )
        .with_step(
            StepDefinition::new("package", "Generate evidence package", 5)
                .with_description("Bundle sealed evidence with the control narrative")
                .with_payload("documents", "19")
                .with_payload("evidence_items", "1,204"),
        )
        .with_step(
            StepDefinition::new("sign-off", "Management sign-off", 2)
                .with_description("CISO attests the package before it is shared with the auditor")
                .manual()
                .with_payload("signed_by", "CISO")
                .with_payload("status", "ready for fieldwork"),
        )
}
