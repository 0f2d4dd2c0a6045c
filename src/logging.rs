//! Structured logging setup using `tracing-subscriber` and `tracing-appender`.
//!
//! Stdout carries the bus protocol, so every layer writes elsewhere:
//! - **Production** ([`init_production`]): rotated JSON files + stderr console
//! - **CLI** ([`init_cli`]): stderr console only

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Log file prefix; the appender adds a `.YYYY-MM-DD` suffix.
pub const LOG_FILE_PREFIX: &str = "telegram-bridge.log";

/// Holds the non-blocking writer guard for file logging.
///
/// Dropping it flushes pending log entries and closes the file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialise logging for a long-running adapter.
///
/// Writes JSON logs to `{logs_dir}/telegram-bridge.log.YYYY-MM-DD` with daily
/// rotation, plus human-readable output on stderr. `RUST_LOG` controls both
/// (default: `info`).
///
/// # Errors
///
/// Returns an error if the logs directory cannot be created or a global
/// subscriber is already installed.
pub fn init_production(logs_dir: &Path) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir).map_err(|e| {
        anyhow::anyhow!(
            "failed to create logs directory {}: {e}",
            logs_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(json_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(LoggingGuard { _guard: guard })
}

/// Initialise stderr-only logging. Controlled by `RUST_LOG` (default: `info`).
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialise logging as configured: file logging when a directory is set,
/// console only otherwise.
///
/// # Errors
///
/// See [`init_production`].
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<LoggingGuard>> {
    match &config.dir {
        Some(dir) => init_production(dir).map(Some),
        None => {
            init_cli();
            Ok(None)
        }
    }
}
