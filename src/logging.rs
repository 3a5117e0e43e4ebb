//! Logging initialization for embedding applications.

use crate::error::{GraphError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber with the given filter directive.
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_new(level)
                .map_err(|_| GraphError::InvalidArgument("invalid log filter directive"))?,
        )
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|_| GraphError::InvalidArgument("logging already initialized"))
}
