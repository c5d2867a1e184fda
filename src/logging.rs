//! Tracing setup.
//!
//! The TUI owns the terminal, so while it runs logs go to a file or
//! nowhere. One-shot CLI modes log to stderr.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    Off,
}

/// Install the global subscriber.
///
/// `level` is used unless `RUST_LOG` is set. The returned guard flushes the
/// file writer on drop and must be held until exit.
pub fn init(level: &str, target: LogTarget) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?,
    };

    match target {
        LogTarget::Off => Ok(None),
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .with(filter)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;
            Ok(None)
        }
        LogTarget::File(path) => {
            let (directory, file_name) = split_log_path(&path)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;
            Ok(Some(guard))
        }
    }
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Log file path '{}' has no file name", path.display()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, PathBuf::from(file_name)))
}
