use crate::scenario::{ScenarioDefinition, StepDefinition};

pub(super) fn build() -> ScenarioDefinition {
    ScenarioDefinition::new("evidence-sweep", "Morning Evidence Sweep")
        .with_description(
            "Overnight collectors pull SOC 2 evidence from cloud and code hosts before stand-up",
        )
        .with_step(
            StepDefinition::new("aws-scan", "Scan AWS accounts", 6)
                .with_description("IAM, CloudTrail and S3 encryption posture across 3 accounts")
                .with_payload("accounts", "3")
                .with_payload("controls_checked", "47")
                .with_payload("findings", "2 medium"),
        )
        .with_step(
            StepDefinition::new("github-scan", "Review GitHub repositories", 4)
                .with_description("Branch protection, required reviews and secret scanning")
                .with_payload("repositories", "28")
                .with_payload("protected_branches", "28/28")
                .with_payload("secrets_detected", "0"),
        )
        .with_step(
            StepDefinition::new("evidence-hash", "Seal evidence", 3)
                .with_description("Hash collected artifacts into the tamper-evident ledger")
                .with_payload("artifacts", "312")
                .with_payload("merkle_root", "9f2c…e41a"),
        )
        .with_step(
            StepDefinition::new("triage", "Triage findings", 5)
                .with_description("Compliance lead reviews the two medium findings")
                .manual()
                .with_payload("assigned_to", "Security Engineering")
                .with_payload("due", "2 business days"),
        )
        .with_step(
            StepDefinition::new("trust-score", "Update trust score", 3)
                .with_description("Recompute the public trust score from fresh evidence")
                .with_payload("previous", "91")
                .with_payload("current", "93"),
        )
}
