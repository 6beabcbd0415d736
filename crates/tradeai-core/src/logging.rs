//! File-based tracing bootstrap.
//!
//! The TUI owns the terminal, so log output goes to a daily-rolled file
//! under ${TRADEAI_HOME}/logs. Filtering follows the TRADEAI_LOG env var
//! (tracing `EnvFilter` syntax), defaulting to `info`.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Env var controlling the log filter (EnvFilter syntax).
pub const LOG_FILTER_ENV: &str = "TRADEAI_LOG";

/// Initializes file logging.
///
/// Returns the appender guard; hold it for the lifetime of the process or
/// buffered lines are lost on exit.
pub fn init() -> Result<WorkerGuard> {
    let dir = crate::config::paths::logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, "tradeai.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(guard)
}
