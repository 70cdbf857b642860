use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format {0:?} (expected text, json or journald)")]
    InvalidFormat(String),
    #[error("journald logging needs a Linux build with the `journald` feature")]
    JournaldNotSupported,
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
    #[error("logger initialization failed: {0}")]
    InitializationFailed(String),
    #[error("invalid log filter {0:?}")]
    InvalidLogLevel(String),
}
