//! Configuration struct definitions.
//!
//! Every section derives `Default` and uses `#[serde(default)]`, so a
//! partial file deserializes with the remaining fields at their defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playback clock and scenario selection.
    pub playback: PlaybackSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// PlaybackSection
// ---------------------------------------------------------------------------

/// Playback timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSection {
    /// Wall-clock milliseconds per playback second.
    pub tick_interval_ms: u64,
    /// Delay before an automatic step hands over to the next one.
    /// `0` hands over on the completing tick.
    pub auto_advance_delay_ms: u64,
    /// Scenario played when none is named on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_scenario: Option<String>,
}

impl Default for PlaybackSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            auto_advance_delay_ms: 500,
            default_scenario: None,
        }
    }
}

impl PlaybackSection {
    /// The tick interval as a [`Duration`].
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The auto-advance delay as a [`Duration`].
    #[must_use]
    pub fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.auto_advance_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["velocity_playback=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: Config = toml::from_str("[playback]\ntick_interval_ms = 200").unwrap();
        assert_eq!(config.playback.tick_interval_ms, 200);
        assert_eq!(config.playback.auto_advance_delay_ms, 500);
        assert_eq!(config.logging, LoggingSection::default());
    }

    #[test]
    fn test_durations() {
        let section = PlaybackSection::default();
        assert_eq!(section.tick_interval(), Duration::from_secs(1));
        assert_eq!(section.auto_advance_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_default_scenario_round_trips_through_toml() {
        let mut config = Config::default();
        config.playback.default_scenario = Some("vendor-review".to_owned());
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
