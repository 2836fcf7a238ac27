//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry;
use tracing_subscriber::EnvFilter;

use crate::constants::{DEBUG_LOG_FILE, DEBUG_LOG_FILTER, DEFAULT_LOG_FILTER, LOG_ENV};

/// Install the global subscriber.
///
/// Logs go to stderr filtered by `POCKET_LOG`. With `debug`, they go to
/// `debug.log` in the working directory at debug level instead.
pub fn setup_tracing(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(DEBUG_LOG_FILE)
            .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", DEBUG_LOG_FILE, e))?;

        registry()
            .with(EnvFilter::new(DEBUG_LOG_FILTER))
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init();
        return Ok(());
    }

    registry()
        .with(EnvFilter::new(
            std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        ))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}
