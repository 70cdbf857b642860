use std::io::IsTerminal;

use crate::logger::{error::LoggerError, format::LoggerFormat};

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `excon=debug,warn`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    /// Replace the filter directive after checking it parses.
    pub fn with_level(mut self, level: impl Into<String>) -> Result<Self, LoggerError> {
        let level = level.into();
        crate::logger::log::mk_filter(&level)?;
        self.level = level;
        Ok(self)
    }

    pub fn with_format(mut self, format: LoggerFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || std::io::stderr().is_terminal();
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: true,
            use_color,
        }
    }
}
