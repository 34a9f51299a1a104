//! `list` - catalog overview.

use velocity_playback::{ScenarioCatalog, ScenarioDefinition};

use crate::theme::{Theme, format_elapsed};

pub(crate) fn list_scenarios(catalog: &ScenarioCatalog, json: bool) -> anyhow::Result<()> {
    if json {
        let scenarios: Vec<&ScenarioDefinition> = catalog.iter().map(AsRef::as_ref).collect();
        println!("{}", serde_json::to_string_pretty(&scenarios)?);
        return Ok(());
    }

    println!("{}", Theme::header("Scenarios"));
    println!("  {:<18} {:>5} {:>8}  TITLE", "ID", "STEPS", "LENGTH");
    println!("{}", Theme::separator());
    for scenario in catalog.iter() {
        println!(
            "  {:<18} {:>5} {:>8}  {}",
            scenario.id,
            scenario.len(),
            format_elapsed(scenario.total_duration_seconds()),
            scenario.title
        );
    }
    println!(
        "\n{}",
        Theme::dimmed(&format!("{} scenario(s)", catalog.len()))
    );
    Ok(())
}
