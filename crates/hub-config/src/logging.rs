//! Log verbosity configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Log verbosity applied by hosts that install a `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    #[default]
    Error,
    Off,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    #[must_use]
    pub const fn as_filter_directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_directive())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_error() {
        assert_eq!(LoggingConfig::default().level, LogLevel::Error);
    }

    #[test]
    fn display_matches_filter_directive() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Off.as_filter_directive(), "off");
    }
}
