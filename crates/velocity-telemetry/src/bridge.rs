//! Conversion from the `[logging]` config section.

use velocity_config::LoggingSection;

use crate::logging::{LogConfig, LogFormat};

impl From<&LoggingSection> for LogConfig {
    /// Unknown formats fall back to [`LogFormat::default`].
    fn from(section: &LoggingSection) -> Self {
        let format = section.format.parse().unwrap_or_default();
        let mut config = Self::new(section.level.clone()).with_format(format);
        config.directives.clone_from(&section.directives);
        if format == LogFormat::Json {
            config.ansi = false;
        }
        config
    }
}
