//! Rotated log file output.
//!
//! Log lines are written through a non-blocking worker; the returned
//! [`WorkerGuard`] must stay alive for as long as logs should reach the file.

use gatewayctl_common::{GatewayCtlError, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{Builder, Rotation};

/// File destination for log output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileConfig {
    /// Path of the active log file; rotated files get a date suffix
    pub path: PathBuf,
    /// Rotated files kept besides the active one
    pub max_backups: usize,
}

/// Open a daily rotated appender for `config.path` behind a non-blocking writer.
pub fn file_writer(config: &LogFileConfig) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = config
        .path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = config
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            GatewayCtlError::Config(format!("invalid log file name: {}", config.path.display()))
        })?;

    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .max_log_files(config.max_backups + 1)
        .build(dir)
        .map_err(|e| GatewayCtlError::Observability(format!("log file {file_name}: {e}")))?;

    Ok(tracing_appender::non_blocking(appender))
}

pub(crate) fn open(
    config: Option<&LogFileConfig>,
) -> Result<(Option<NonBlocking>, Option<WorkerGuard>)> {
    match config {
        Some(config) => {
            let (writer, guard) = file_writer(config)?;
            Ok((Some(writer), Some(guard)))
        }
        None => Ok((None, None)),
    }
}
