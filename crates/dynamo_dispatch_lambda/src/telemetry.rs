//! Structured logging for the Lambda process.

use std::io;

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs a JSON-lines subscriber on stderr, which the Lambda runtime
/// forwards to CloudWatch. Call once at cold start.
pub fn initialise(log_filter: &str) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_new(log_filter).map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(io::stderr)
        .json()
        .flatten_event(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
