//! # Logging Utilities
//!
//! Logging infrastructure for Lumen using `tracing`.
//!
//! The formatting engine reports contained faults (unreadable memory, invalid
//! pointers, unsupported types) as `debug` events and dispatch decisions as
//! `trace` events. This module wires those events to a subscriber.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumen_utils::init_logging;
//!
//! // Initialize with default settings (reads from RUST_LOG env var)
//! init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("Inspector ready");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=lumen_core=trace`)
//! - `LUMEN_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `LUMEN_LOG_FILE`: Optional path to log file (if not set, logs only to stderr).
//!   A directory gets a dated `YYYY-MM-DD-lumen.log` file inside it.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default for development)
    Pretty,
    /// JSON format, one event per line
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level, shows contained formatting faults
    Debug,
    /// Trace level, shows every dispatch decision
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Initialize logging with default settings
///
/// Reads configuration from environment variables:
/// - `RUST_LOG`: Log level filter (e.g., `debug`, `lumen_core=trace`)
/// - `LUMEN_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
/// - `LUMEN_LOG_FILE`: Optional path to log file
///
/// Returns the file writer guard when file logging is active. Keep it alive
/// for as long as events should be flushed to the file.
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> Result<Option<WorkerGuard>, LoggingError>
{
    let format = env::var("LUMEN_LOG_FORMAT")
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or(LogFormat::Pretty);

    let default_level = env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LogLevel>().ok())
        .map_or(Level::INFO, Into::into);

    init_logging_internal(format, default_level)
}

/// Initialize logging with explicit level and format
///
/// `RUST_LOG` still wins when it is set, so module-specific filters keep working.
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<Option<WorkerGuard>, LoggingError>
{
    init_logging_internal(format, level.into())
}

fn init_logging_internal(format: LogFormat, default_level: Level) -> Result<Option<WorkerGuard>, LoggingError>
{
    // RUST_LOG can override the default level with more specific filters
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let log_file = env::var("LUMEN_LOG_FILE").ok().map(PathBuf::from);

    // Logs go to stderr so that rendered trees on stdout stay pipeable
    let console_layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(env_filter.clone())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(env_filter.clone())
            .boxed(),
    };

    let Some(file_path) = log_file else {
        Registry::default().with(console_layer).try_init()?;
        return Ok(None);
    };

    let (directory, file_name) = prepare_log_file(&file_path)?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(env_filter)
            .boxed(),
    };

    Registry::default().with(console_layer).with(file_layer).try_init()?;
    Ok(Some(guard))
}

/// Resolve `LUMEN_LOG_FILE` to a directory and file name the appender can open
///
/// A directory gets a file named after today's date. Missing parent
/// directories are created. The file is opened once up front because the
/// appender panics on a path it cannot open.
///
/// ## Errors
///
/// `FileError` when the directory cannot be created or the file cannot be opened.
fn prepare_log_file(path: &Path) -> Result<(PathBuf, OsString), LoggingError>
{
    let (directory, file_name) = if path.is_dir() {
        let today = Utc::now().format("%Y-%m-%d");
        (path.to_path_buf(), OsString::from(format!("{today}-lumen.log")))
    } else {
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("no file name in {}", path.display()))
        })?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (directory, file_name.to_os_string())
    };

    fs::create_dir_all(&directory)?;
    OpenOptions::new().create(true).append(true).open(directory.join(&file_name))?;
    Ok((directory, file_name))
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Unknown log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Unknown log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// A global subscriber was already installed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(#[from] TryInitError),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
