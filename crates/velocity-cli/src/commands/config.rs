//! `config` - inspect the resolved configuration.

use std::path::Path;

use velocity_config::{ResolvedConfig, ShowFormat, loader};

use crate::theme::Theme;

pub(crate) fn show_config(resolved: &ResolvedConfig, format: &str) -> anyhow::Result<()> {
    let format = match format {
        "json" => ShowFormat::Json,
        _ => ShowFormat::Toml,
    };
    let rendered = resolved
        .show(format)
        .map_err(|e| anyhow::anyhow!("failed to render config: {e}"))?;
    print!("{rendered}");
    Ok(())
}

pub(crate) fn show_paths(workspace_root: Option<&Path>) {
    println!("{}", Theme::header("Config file search paths"));
    for path in loader::config_paths(workspace_root) {
        let status = if path.is_file() {
            Theme::success("found")
        } else {
            Theme::dimmed("missing")
        };
        println!("  {}  {status}", path.display());
    }
}
