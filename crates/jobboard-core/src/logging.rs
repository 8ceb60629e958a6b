#![forbid(unsafe_code)]

//! Native log output.
//!
//! Installs a `tracing-subscriber` fmt layer filtered by `RUST_LOG`, falling
//! back to `default_directive` (for example `"jobboard_core=info"`). The
//! browser runner does not use this; it buffers its own log lines.

use tracing_subscriber::EnvFilter;

use crate::error::{BoardError, Result};

/// Install the global subscriber. Fails if one is already installed.
pub fn init(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|err| BoardError::Logging {
            message: err.to_string(),
        })?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| BoardError::Logging {
            message: err.to_string(),
        })
}
