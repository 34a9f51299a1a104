//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Shortest accepted tick interval.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;
/// Longest accepted tick interval.
pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;
/// Longest accepted auto-advance delay.
pub const MAX_AUTO_ADVANCE_DELAY_MS: u64 = 10_000;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_playback(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_playback(config: &Config) -> ConfigResult<()> {
    let p = &config.playback;

    if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&p.tick_interval_ms) {
        return Err(ConfigError::ValidationError {
            field: "playback.tick_interval_ms".to_owned(),
            message: format!(
                "tick_interval_ms {} is out of range; must be between \
                 {MIN_TICK_INTERVAL_MS} and {MAX_TICK_INTERVAL_MS}",
                p.tick_interval_ms
            ),
        });
    }

    if p.auto_advance_delay_ms > MAX_AUTO_ADVANCE_DELAY_MS {
        return Err(ConfigError::ValidationError {
            field: "playback.auto_advance_delay_ms".to_owned(),
            message: format!(
                "auto_advance_delay_ms ({}) exceeds maximum allowed value \
                 ({MAX_AUTO_ADVANCE_DELAY_MS})",
                p.auto_advance_delay_ms
            ),
        });
    }

    if p
        .default_scenario
        .as_deref()
        .is_some_and(|id| id.trim().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "playback.default_scenario".to_owned(),
            message: "default_scenario must not be empty when set".to_owned(),
        });
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    if !VALID_LEVELS.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                VALID_LEVELS.join(", ")
            ),
        });
    }

    if !VALID_FORMATS.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                VALID_FORMATS.join(", ")
            ),
        });
    }

    if config.logging.directives.iter().any(|d| d.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: "logging.directives".to_owned(),
            message: "directives must not contain empty entries".to_owned(),
        });
    }

    Ok(())
}
