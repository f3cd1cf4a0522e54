//! Logging setup for the batch jobs.
//!
//! Console output always goes to stderr so it never mixes with artifacts.
//! With a log directory, two daily-rotated files are added:
//!
//! - `county-panel.<date>.log`: everything at the configured level
//! - `error.<date>.log`: warnings and errors only
//!
//! ```no_run
//! use county_panel::logging;
//!
//! let _guards = logging::init(None).expect("Failed to initialize logging");
//! tracing::info!("Run started");
//! ```

use anyhow::{Context as _, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const MAX_LOG_FILES: usize = 10;

fn rolling_appender(log_dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to create {prefix} file appender"))
}

/// Install the global subscriber.
///
/// Defaults to `info`; `RUST_LOG` overrides it. The returned guards flush the
/// file writers on drop and must be held until the run finishes.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or a file appender fails.
pub fn init(log_dir: Option<&Path>) -> Result<Vec<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let mut guards = Vec::new();
    let file_layers = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            let (all_writer, all_guard) =
                tracing_appender::non_blocking(rolling_appender(dir, "county-panel")?);
            let (error_writer, error_guard) =
                tracing_appender::non_blocking(rolling_appender(dir, "error")?);
            guards.push(all_guard);
            guards.push(error_guard);

            let all_logs_layer = fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(all_writer);

            let error_logs_layer = fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(error_writer)
                .with_filter(EnvFilter::new("warn"));

            Some(all_logs_layer.and_then(error_logs_layer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!("Logging to {}", dir.display());
    }

    Ok(guards)
}
