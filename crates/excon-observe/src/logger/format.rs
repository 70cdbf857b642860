use std::{fmt, str::FromStr};

use crate::logger::error::LoggerError;

/// Shape of log output, as named in `EXCON_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggerFormat {
    /// Human-readable lines on stderr.
    #[default]
    Text,
    /// One JSON object per event on stderr.
    Json,
    /// Native journal entries; Linux with the `journald` feature only.
    Journald,
}

impl LoggerFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LoggerFormat::Text => "text",
            LoggerFormat::Json => "json",
            LoggerFormat::Journald => "journald",
        }
    }

    fn journald() -> Result<Self, LoggerError> {
        if cfg!(all(target_os = "linux", feature = "journald")) {
            Ok(LoggerFormat::Journald)
        } else {
            Err(LoggerError::JournaldNotSupported)
        }
    }
}

impl fmt::Display for LoggerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(LoggerFormat::Text),
            "json" => Ok(LoggerFormat::Json),
            "journald" | "journal" => Self::journald(),
            _ => Err(LoggerError::InvalidFormat(s.to_string())),
        }
    }
}
