//! Environment variable fallbacks.
//!
//! Env vars are a fallback, not an override: they only fill fields that no
//! config file set.

use std::collections::HashMap;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `VELOCITY_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "VELOCITY_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "VELOCITY_LOG_FORMAT",
        field_path: "logging.format",
    },
    EnvMapping {
        var_name: "VELOCITY_TICK_INTERVAL_MS",
        field_path: "playback.tick_interval_ms",
    },
    EnvMapping {
        var_name: "VELOCITY_AUTO_ADVANCE_DELAY_MS",
        field_path: "playback.auto_advance_delay_ms",
    },
    EnvMapping {
        var_name: "VELOCITY_DEFAULT_SCENARIO",
        field_path: "playback.default_scenario",
    },
];

/// Fields parsed as integers rather than strings.
const INTEGER_FIELDS: [&str; 2] = ["playback.tick_interval_ms", "playback.auto_advance_delay_ms"];

/// Apply environment variable fallbacks to fields that were not set by any
/// config file. Fields only set by the embedded defaults count as unset.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let set_by_file = sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults);
        if set_by_file {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );

            set_field_from_string(merged, mapping.field_path, val);
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Set a field in the TOML tree from a string value, creating intermediate
/// tables as needed.
fn set_field_from_string(root: &mut toml::Value, path: &str, val: &str) {
    let toml_val = coerce_to_toml_value(path, val);
    let Some((parents, leaf)) = path.rsplit_once('.') else {
        if let Some(table) = root.as_table_mut() {
            table.insert(path.to_owned(), toml_val);
        }
        return;
    };

    let mut current = root;
    for segment in parents.split('.') {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry(segment.to_owned())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), toml_val);
    }
}

/// Coerce a string env var value to the TOML type of its field.
///
/// Unparseable integers stay strings so deserialization reports the field.
fn coerce_to_toml_value(path: &str, val: &str) -> toml::Value {
    if INTEGER_FIELDS.contains(&path)
        && let Ok(i) = val.trim().parse::<i64>()
    {
        return toml::Value::Integer(i);
    }

    toml::Value::String(val.to_owned())
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_apply_env_fallbacks() {
        let mut merged: toml::Value = toml::from_str("[playback]\ntick_interval_ms = 1000").unwrap();
        let mut sources = FieldSources::new();
        let env = make_env(&[("VELOCITY_LOG_LEVEL", "debug")]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 1);
        assert_eq!(merged["logging"]["level"].as_str().unwrap(), "debug");
        assert_eq!(
            sources.get("logging.level"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn test_env_fallback_skips_file_values() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"warn\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::User);

        let env = make_env(&[("VELOCITY_LOG_LEVEL", "debug")]);
        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 0);
        assert_eq!(merged["logging"]["level"].as_str().unwrap(), "warn");
    }

    #[test]
    fn test_env_fallback_replaces_defaults() {
        let mut merged: toml::Value =
            toml::from_str("[playback]\ntick_interval_ms = 1000").unwrap();
        let mut sources = FieldSources::new();
        sources.insert(
            "playback.tick_interval_ms".to_owned(),
            ConfigLayer::Defaults,
        );

        let env = make_env(&[("VELOCITY_TICK_INTERVAL_MS", "250")]);
        apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(merged["playback"]["tick_interval_ms"].as_integer(), Some(250));
    }

    #[test]
    fn test_coerce_integer() {
        let v = coerce_to_toml_value("playback.auto_advance_delay_ms", " 0 ");
        assert_eq!(v.as_integer().unwrap(), 0);
    }

    #[test]
    fn test_coerce_bad_integer_stays_string() {
        let v = coerce_to_toml_value("playback.tick_interval_ms", "fast");
        assert_eq!(v.as_str().unwrap(), "fast");
    }

    #[test]
    fn test_coerce_string_default() {
        let v = coerce_to_toml_value("playback.default_scenario", "gdpr-transfer");
        assert_eq!(v.as_str().unwrap(), "gdpr-transfer");
    }

    #[test]
    fn test_set_field_creates_tables() {
        let mut root = toml::Value::Table(toml::map::Map::new());
        set_field_from_string(&mut root, "playback.default_scenario", "vendor-review");
        assert_eq!(
            root["playback"]["default_scenario"].as_str(),
            Some("vendor-review")
        );
    }
}
