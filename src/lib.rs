//! Structured application logger.
//!
//! Leveled JSON logging with sensitive-field redaction and an HTTP
//! access-log middleware for axum/tower services.
//!
//! ```text
//! caller ─▶ Logger (gate) ─▶ Sanitizer ─▶ Formatter ─▶ Backend ─▶ console / rotating files
//! request ─▶ RequestLogger ─▶ (response finished) ─▶ Logger
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod levels;
pub mod logger;
pub mod sanitize;

pub use backend::{Backend, LogEntry, MemoryBackend, TracingBackend, TransportBackend};
pub use config::LoggerConfig;
pub use error::{BackendError, LoggerError, LoggerResult};
pub use format::{Formatter, LogRecord, SENTINEL};
pub use http::{RequestLogger, RequestLoggerLayer};
pub use levels::Level;
pub use logger::Logger;
pub use sanitize::Sanitizer;
