use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Identifier journald entries are filed under.
pub const SYSLOG_IDENTIFIER: &str = "excon";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber.
///
/// Every sink writes to stderr or the journal: stdout carries protocol replies.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = mk_filter(&cfg.level)?;
    let sink = match cfg.format {
        LoggerFormat::Text => text_layer(cfg),
        LoggerFormat::Json => json_layer(cfg),
        LoggerFormat::Journald => journald_layer()?,
    };

    tracing_subscriber::registry()
        .with(sink.with_filter(filter))
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

pub(crate) fn mk_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidLogLevel(level.to_string()))
}

fn text_layer(cfg: &LoggerConfig) -> BoxedLayer {
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg.use_color)
        .with_target(cfg.with_targets)
        .with_timer(local_rfc3339())
        .boxed()
}

fn json_layer(cfg: &LoggerConfig) -> BoxedLayer {
    fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_current_span(false)
        .with_target(cfg.with_targets)
        .with_timer(local_rfc3339())
        .boxed()
}

// Falls back to UTC when the local offset cannot be determined soundly.
fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald_layer() -> Result<BoxedLayer, LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?
        .with_syslog_identifier(SYSLOG_IDENTIFIER.to_string());
    Ok(layer.boxed())
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald_layer() -> Result<BoxedLayer, LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}
