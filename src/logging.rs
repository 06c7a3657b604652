//! Logging setup for the binary.

use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter, Registry};

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    Install(TryInitError),
}

/// Install a stdout subscriber filtered by `RUST_LOG` (default `info`).
pub fn init() -> Result<(), LoggingError> {
    Registry::default()
        .with(build_env_filter())
        .with(fmt::layer().with_target(false))
        .try_init()
        .map_err(LoggingError::Install)
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
