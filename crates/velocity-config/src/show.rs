//! Source-annotated display of the resolved configuration.

use std::fmt::{self, Write as _};

use crate::merge::FieldSources;
use crate::types::Config;

/// A resolved configuration together with source annotations.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final merged configuration.
    pub config: Config,
    /// Dotted field path → which layer set the value.
    pub field_sources: FieldSources,
    /// Config file paths that were loaded (in precedence order).
    pub loaded_files: Vec<String>,
}

/// Output format for [`ResolvedConfig::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with inline comments showing source.
    Toml,
    /// JSON (for programmatic consumption).
    Json,
}

impl ResolvedConfig {
    /// Wrap a config loaded from a single file.
    #[must_use]
    pub fn from_file(config: Config, path: impl Into<String>) -> Self {
        Self {
            config,
            field_sources: FieldSources::new(),
            loaded_files: vec![path.into()],
        }
    }

    /// Render the resolved config.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn show(&self, format: ShowFormat) -> Result<String, fmt::Error> {
        match format {
            ShowFormat::Toml => self.show_toml(),
            ShowFormat::Json => serde_json::to_string_pretty(&self.config).map_err(|_| fmt::Error),
        }
    }

    fn show_toml(&self) -> Result<String, fmt::Error> {
        let toml_str = toml::to_string_pretty(&self.config).map_err(|_| fmt::Error)?;
        let mut output = String::new();

        output.push_str("# Resolved Velocity configuration\n");
        output.push_str("# Source annotations: [defaults] [user] [workspace] [environment]\n");
        if !self.loaded_files.is_empty() {
            output.push_str("#\n# Loaded files (in precedence order):\n");
            for (i, path) in self.loaded_files.iter().enumerate() {
                writeln!(output, "#   {}. {path}", i.saturating_add(1))?;
            }
        }
        output.push('\n');

        let mut section = String::new();
        for line in toml_str.lines() {
            let trimmed = line.trim();
            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                name.clone_into(&mut section);
            }

            match self.annotate_line(trimmed, &section) {
                Some(annotation) => writeln!(output, "{line}  # {annotation}")?,
                None => writeln!(output, "{line}")?,
            }
        }

        Ok(output)
    }

    /// Source annotation for a `key = value` line inside `section`.
    fn annotate_line(&self, trimmed: &str, section: &str) -> Option<String> {
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }
        let key = trimmed.split('=').next()?.trim();
        let field_path = if section.is_empty() {
            key.to_owned()
        } else {
            format!("{section}.{key}")
        };

        self.field_sources
            .get(&field_path)
            .map(|layer| format!("[{layer}]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::ConfigLayer;

    fn resolved() -> ResolvedConfig {
        let mut field_sources = FieldSources::new();
        field_sources.insert("playback.tick_interval_ms".to_owned(), ConfigLayer::Workspace);
        field_sources.insert("logging.level".to_owned(), ConfigLayer::Defaults);
        ResolvedConfig {
            config: Config::default(),
            field_sources,
            loaded_files: vec!["/srv/demo/.velocity/config.toml".to_owned()],
        }
    }

    #[test]
    fn test_show_toml_annotates_sources() {
        let output = resolved().show(ShowFormat::Toml).unwrap();
        assert!(output.contains("Resolved Velocity configuration"));
        assert!(output.contains("1. /srv/demo/.velocity/config.toml"));

        let tick = output
            .lines()
            .find(|l| l.starts_with("tick_interval_ms"))
            .unwrap();
        assert!(tick.contains("[workspace"));
        let level = output.lines().find(|l| l.starts_with("level")).unwrap();
        assert!(level.ends_with("[defaults]"));
    }

    #[test]
    fn test_show_json_default() {
        let output = resolved().show(ShowFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["playback"]["tick_interval_ms"], 1000);
    }

    #[test]
    fn test_from_file() {
        let resolved = ResolvedConfig::from_file(Config::default(), "demo.toml");
        assert_eq!(resolved.loaded_files, ["demo.toml"]);
        assert!(resolved.field_sources.is_empty());
    }
}
