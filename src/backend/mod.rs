//! Backend seam between the logger core and its sinks.
//!
//! # Data Flow
//! ```text
//! Logger (gate → sanitize → format)
//!     → LogEntry { record, line }
//!     → Backend::write
//!         → transport.rs (console, rotating files)
//!         → memory.rs (in-process capture)
//!         → TracingBackend (tracing events)
//! ```
//!
//! # Design Decisions
//! - The core never depends on a concrete sink; tests substitute `MemoryBackend`
//! - Backends own their locking; `write` takes `&self`
//! - The threshold lives in the logger and is mirrored to the backend on change

pub mod exceptions;
pub mod memory;
pub mod transport;

use std::sync::Arc;

use serde_json::Value;

use crate::error::BackendError;
use crate::format::LogRecord;
use crate::levels::Level;

pub use exceptions::ExceptionSink;
pub use memory::MemoryBackend;
pub use transport::{Transport, TransportBackend};

/// A sanitized record ready for output.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub record: LogRecord,
    /// JSON line produced by the formatter.
    pub line: String,
}

impl LogEntry {
    pub fn level(&self) -> Level {
        self.record.level
    }

    pub fn message(&self) -> &str {
        &self.record.message
    }

    /// The `{meta, context?}` value written alongside the message.
    pub fn attachment(&self) -> Value {
        self.record.attachment()
    }
}

/// Destination for log entries.
pub trait Backend: Send + Sync {
    /// Write one entry. Errors are handled by the logger.
    fn write(&self, entry: &LogEntry) -> Result<(), BackendError>;

    /// Observe a threshold change.
    fn set_level(&self, _level: Level) {}
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn write(&self, entry: &LogEntry) -> Result<(), BackendError> {
        (**self).write(entry)
    }

    fn set_level(&self, level: Level) {
        (**self).set_level(level)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn write(&self, entry: &LogEntry) -> Result<(), BackendError> {
        (**self).write(entry)
    }

    fn set_level(&self, level: Level) {
        (**self).set_level(level)
    }
}

/// Forwards entries into the `tracing` ecosystem.
///
/// `verbose` and `silly` both map to TRACE.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBackend;

impl Backend for TracingBackend {
    fn write(&self, entry: &LogEntry) -> Result<(), BackendError> {
        let message = entry.message();
        let line = entry.line.as_str();
        match entry.level() {
            Level::Error => tracing::error!(target: "service_logger::record", record = line, "{}", message),
            Level::Warn => tracing::warn!(target: "service_logger::record", record = line, "{}", message),
            Level::Info => tracing::info!(target: "service_logger::record", record = line, "{}", message),
            Level::Debug => tracing::debug!(target: "service_logger::record", record = line, "{}", message),
            Level::Verbose | Level::Silly => {
                tracing::trace!(target: "service_logger::record", record = line, "{}", message)
            }
        }
        Ok(())
    }
}
