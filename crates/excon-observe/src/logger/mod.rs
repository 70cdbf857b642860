mod config;
mod error;
mod format;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;
pub use log::SYSLOG_IDENTIFIER;

/// Route `tracing` events to stderr (or the journal) as `cfg` describes.
///
/// Fails if a global subscriber is already installed.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::install(cfg)
}
