//! # Lumen Utilities
//!
//! Shared utilities and logging for Lumen.
//!
//! The engine itself only emits `tracing` events; binaries and test harnesses
//! call into this crate once at startup to decide where those events go.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{LogFormat, LogLevel, LoggingError, init_logging, init_logging_with_level};
pub use tracing::{debug, error, info, trace, warn};
