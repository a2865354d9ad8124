//! File logging. The TUI owns the terminal, so nothing is logged to stdout or stderr.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "lifelog";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Unsupported log level '{0}' (expected trace|debug|info|warn|error)")]
    InvalidLevel(String),
    #[error("Failed to create log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to start logger: {0}")]
    Start(#[from] flexi_logger::FlexiLoggerError),
    #[error("Logging already initialized at {0}")]
    AlreadyInitialized(PathBuf),
}

/// Start rotating file logs in `log_dir`.
///
/// `RUST_LOG` overrides `level` when set. Calling again with the same
/// directory is a no-op; a different directory is rejected.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        if state.log_dir == log_dir {
            return Ok(());
        }
        return Err(LoggingError::AlreadyInitialized(state.log_dir.clone()));
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, LoggingError> {
        std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::Directory {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let handle = Logger::try_with_env_or_str(level)?
            .log_to_file(FileSpec::default().directory(log_dir).basename(LOG_FILE_BASENAME))
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()?;

        log::info!(
            "lifelog {} starting, level={} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );

        Ok(LoggingState {
            level,
            log_dir: log_dir.to_path_buf(),
            _handle: handle,
        })
    })?;

    if state.log_dir != log_dir {
        return Err(LoggingError::AlreadyInitialized(state.log_dir.clone()));
    }
    Ok(())
}

/// `(level, log_dir)` once logging is active
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE.get().map(|s| (s.level, s.log_dir.clone()))
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::InvalidLevel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_normalized() {
        assert_eq!(normalize_level(" INFO ").unwrap(), "info");
        assert_eq!(normalize_level("warning").unwrap(), "warn");
        assert!(matches!(normalize_level("loud"), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn init_is_idempotent_and_rejects_a_second_directory() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        init_logging("info", dir.path()).unwrap();
        init_logging("info", dir.path()).unwrap();
        assert!(matches!(
            init_logging("info", other.path()),
            Err(LoggingError::AlreadyInitialized(_))
        ));
        let (_, active) = logging_status().unwrap();
        assert_eq!(active, dir.path());
    }
}
