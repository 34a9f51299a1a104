//! `show <id>` - step breakdown of one scenario.

use velocity_playback::ScenarioCatalog;

use crate::theme::{Theme, format_elapsed};

pub(crate) fn show_scenario(catalog: &ScenarioCatalog, id: &str, json: bool) -> anyhow::Result<()> {
    let scenario = catalog.require(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(scenario.as_ref())?);
        return Ok(());
    }

    println!("{}", Theme::header(&scenario.title));
    println!("{}", Theme::dimmed(&scenario.description));
    println!("{}", Theme::separator());
    for (index, step) in scenario.steps.iter().enumerate() {
        let mode = if step.auto_advance { "auto" } else { "manual" };
        println!(
            "  {:>2}. {:<32} {:>6} {}",
            index.saturating_add(1),
            step.title,
            format_elapsed(u64::from(step.duration_seconds)),
            Theme::dimmed(mode)
        );
        println!("      {}", Theme::dimmed(&step.description));
    }
    println!(
        "\n{}",
        Theme::dimmed(&format!(
            "{} step(s), {} nominal",
            scenario.len(),
            format_elapsed(scenario.total_duration_seconds())
        ))
    );
    Ok(())
}
