//! Tracing subscriber setup.
//!
//! Log records go to stdout or to a file through a non-blocking
//! `tracing-appender` writer. The returned [`LoggingGuard`] must be held for
//! the lifetime of the process so buffered records are flushed on exit.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as fmt_layer, EnvFilter, Layer};

use crate::config::LoggingSettings;

/// Output format for log records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line records.
    Text,
    /// One JSON object per record.
    #[default]
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected text or json", other)),
        }
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Cannot open log file {path}: {reason}")]
    LogFile { path: PathBuf, reason: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Keeps the background log writer alive.
#[must_use = "dropping the guard stops the log writer"]
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

impl fmt::Debug for LoggingGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingGuard").finish_non_exhaustive()
    }
}

/// Parses an `EnvFilter` directive such as `info` or `elevate=debug,warn`.
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter {
        filter: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Installs the global subscriber described by `settings`.
pub fn init_logging(settings: &LoggingSettings) -> Result<LoggingGuard, LoggingError> {
    let filter = build_filter(&settings.level)?;

    let (writer, guard) = match &settings.file {
        Some(path) => {
            let (dir, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(&dir).map_err(|e| LoggingError::LogFile {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    install(filter, settings.format, writer, settings.file.is_none())?;
    Ok(LoggingGuard { _worker: guard })
}

/// Installs a text subscriber on stderr, keeping stdout free for output.
pub fn init_stderr_logging(directive: &str) -> Result<LoggingGuard, LoggingError> {
    let filter = build_filter(directive)?;
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    install(filter, LogFormat::Text, writer, true)?;
    Ok(LoggingGuard { _worker: guard })
}

fn install(
    filter: EnvFilter,
    format: LogFormat,
    writer: NonBlocking,
    ansi: bool,
) -> Result<(), LoggingError> {
    let layer = match format {
        LogFormat::Json => fmt_layer::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Text => fmt_layer::layer()
            .with_target(true)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), LoggingError> {
    let file_name = path.file_name().ok_or_else(|| LoggingError::LogFile {
        path: path.to_path_buf(),
        reason: "path has no file name".to_string(),
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(file_name)))
}
