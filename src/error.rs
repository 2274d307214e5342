//! Error taxonomy for the logger.
//!
//! # Propagation
//! - Configuration calls (`set_level`, `set_custom_format`) fail synchronously
//!   and leave the logger unchanged
//! - Backend failures are swallowed by `log`/`log_with_context` and reported
//!   through `tracing`; only `log_async` surfaces them to the caller

use thiserror::Error;

/// Errors returned by the logger's public surface.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// Level name is not in the registry.
    #[error("Invalid log level: {0}. Log level not changed.")]
    InvalidLevel(String),

    /// Custom format was null or not an object.
    #[error("Invalid custom format: expected an object, got {0}")]
    InvalidFormat(&'static str),

    /// The backend raised while writing a record.
    #[error("Backend write failed: {0}")]
    BackendWriteFailure(#[from] BackendError),
}

/// Errors raised by a backend while writing a record.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Sink refused the record.
    #[error("{0}")]
    Rejected(String),
}

/// Result type for logger operations.
pub type LoggerResult<T> = Result<T, LoggerError>;
