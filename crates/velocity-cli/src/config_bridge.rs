//! Bridge from `velocity_config::Config` to playback and logging types.

use velocity_config::{Config, PlaybackSection};
use velocity_playback::DriverConfig;
use velocity_telemetry::LogConfig;

/// Driver timing from the `[playback]` section.
pub(crate) fn to_driver_config(section: &PlaybackSection) -> DriverConfig {
    DriverConfig::default()
        .with_tick_interval(section.tick_interval())
        .with_auto_advance_delay(section.auto_advance_delay())
}

/// Logging setup from the `[logging]` section.
pub(crate) fn to_log_config(config: &Config) -> LogConfig {
    LogConfig::from(&config.logging)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use velocity_playback::AdvancePacing;

    use super::*;

    #[test]
    fn default_section_defers_hand_over() {
        let driver = to_driver_config(&PlaybackSection::default());
        assert_eq!(driver.tick_interval, Duration::from_secs(1));
        assert_eq!(driver.auto_advance_delay, Duration::from_millis(500));
        assert_eq!(driver.pacing(), AdvancePacing::Deferred);
    }

    #[test]
    fn zero_delay_is_immediate() {
        let section = PlaybackSection {
            tick_interval_ms: 200,
            auto_advance_delay_ms: 0,
            default_scenario: None,
        };
        let driver = to_driver_config(&section);
        assert_eq!(driver.tick_interval, Duration::from_millis(200));
        assert_eq!(driver.pacing(), AdvancePacing::Immediate);
    }

    #[test]
    fn log_config_follows_logging_section() {
        let mut config = Config::default();
        config.logging.level = "debug".to_owned();
        config.logging.directives = vec!["velocity_playback=trace".to_owned()];

        let log = to_log_config(&config);
        assert_eq!(log.level, "debug");
        assert_eq!(log.directives, config.logging.directives);
    }
}
