//! Tracing setup
//!
//! With a log directory configured, events are appended to
//! `{log_file_path}/cloudflare-dyndns.log` (no ANSI, default level `info`).
//! Without one they go to stderr at `warn`, so stdout stays reserved for
//! command output. `RUST_LOG` overrides the level in both cases.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside `main.log_file_path`
pub const LOG_FILE_NAME: &str = "cloudflare-dyndns.log";

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop and must be held
/// until the program exits.
pub fn init(log_file_path: &str) -> Result<Option<WorkerGuard>> {
    if log_file_path.trim().is_empty() {
        tracing_subscriber::registry()
            .with(filter("warn"))
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
            .context("Failed to install tracing subscriber")?;
        return Ok(None);
    }

    let appender = file_appender(Path::new(log_file_path))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter("info"))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(Some(guard))
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Append-only writer for `{dir}/cloudflare-dyndns.log`
fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)
        .with_context(|| format!("Error opening log file in {}", dir.display()))
}
