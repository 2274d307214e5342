//! Logger core.
//!
//! # Pipeline
//! ```text
//! log(level, message, meta)
//!     → gate (level rank <= threshold rank, else return)
//!     → sanitize custom format, merge it over meta
//!     → sanitize meta and context
//!     → format JSON line
//!     → Backend::write
//! ```
//!
//! # Design Decisions
//! - Gated-out calls do no work at all: nothing is merged, sanitized or written
//! - `log` and `log_with_context` swallow backend errors and report them via
//!   `tracing`; `log_async` returns them. The asymmetry is part of the contract
//! - Threshold is an atomic rank and the custom format an `ArcSwapOption`,
//!   so one logger can be shared across tasks; only level changes take a lock
//!   so the backend observes them in the same order

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use serde_json::{Map, Value};

use crate::backend::{Backend, LogEntry};
use crate::config::LoggerConfig;
use crate::error::{BackendError, LoggerError, LoggerResult};
use crate::format::{Formatter, LogRecord};
use crate::http::RequestLoggerLayer;
use crate::levels::Level;
use crate::sanitize::Sanitizer;

/// Structured, leveled logger.
pub struct Logger {
    level: AtomicU8,
    level_lock: Mutex<()>,
    custom_format: ArcSwapOption<Map<String, Value>>,
    sanitizer: Sanitizer,
    formatter: Formatter,
    backend: Box<dyn Backend>,
}

impl Logger {
    /// Create a logger at the default `info` threshold.
    pub fn new(backend: impl Backend + 'static) -> Self {
        let logger = Self {
            level: AtomicU8::new(Level::default().rank()),
            level_lock: Mutex::new(()),
            custom_format: ArcSwapOption::empty(),
            sanitizer: Sanitizer::default(),
            formatter: Formatter::new(),
            backend: Box::new(backend),
        };
        logger.backend.set_level(Level::default());
        logger
    }

    /// Set the initial threshold.
    pub fn with_level(self, level: Level) -> Self {
        self.apply_level(level);
        self
    }

    /// Replace the sensitive-field list.
    pub fn with_sensitive_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sanitizer = Sanitizer::new(fields);
        self
    }

    /// Build a logger from configuration over the given backend.
    pub fn from_config(config: &LoggerConfig, backend: impl Backend + 'static) -> LoggerResult<Self> {
        let logger = Self::new(backend).with_sensitive_fields(config.sensitive_fields.iter().cloned());
        logger.set_level(&config.level)?;
        if let Some(format) = &config.custom_format {
            logger.set_custom_format(Value::Object(format.clone()))?;
        }
        Ok(logger)
    }

    /// Change the threshold by name. Unknown names leave it unchanged.
    pub fn set_level(&self, name: &str) -> LoggerResult<()> {
        let level: Level = name.parse()?;
        self.apply_level(level);
        tracing::debug!(level = %level, "Log level changed");
        Ok(())
    }

    /// Threshold and backend change together.
    fn apply_level(&self, level: Level) {
        let _guard = self.level_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.level.store(level.rank(), Ordering::Release);
        self.backend.set_level(level);
    }

    /// Current threshold.
    pub fn level(&self) -> Level {
        Level::from_rank(self.level.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Returns true if a call at `level` would be written.
    pub fn is_enabled(&self, level: Level) -> bool {
        level.is_enabled_at(self.level())
    }

    /// Install a custom format whose fields override per-call metadata.
    ///
    /// `{}` is valid and engages custom formatting with no overrides.
    pub fn set_custom_format(&self, format: Value) -> LoggerResult<()> {
        match format {
            Value::Object(map) => {
                self.custom_format.store(Some(Arc::new(map)));
                Ok(())
            }
            Value::Null => Err(LoggerError::InvalidFormat("null")),
            Value::Bool(_) => Err(LoggerError::InvalidFormat("boolean")),
            Value::Number(_) => Err(LoggerError::InvalidFormat("number")),
            Value::String(_) => Err(LoggerError::InvalidFormat("string")),
            Value::Array(_) => Err(LoggerError::InvalidFormat("array")),
        }
    }

    /// Return to the standard format.
    pub fn clear_custom_format(&self) {
        self.custom_format.store(None);
    }

    pub fn custom_format(&self) -> Option<Arc<Map<String, Value>>> {
        self.custom_format.load_full()
    }

    /// Sanitize `value` with this logger's sensitive fields.
    pub fn sanitize(&self, value: &Value) -> Value {
        self.sanitizer.sanitize(value)
    }

    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// Log `message` with optional metadata. Write failures are reported
    /// through `tracing` and never returned.
    pub fn log(&self, level: Level, message: impl Into<String>, meta: Option<Value>) {
        if let Some(Err(e)) = self.emit(level, message.into(), meta, None) {
            report_failure(level, &e);
        }
    }

    /// Like [`Logger::log`], with `context` written next to `meta`.
    pub fn log_with_context(
        &self,
        level: Level,
        message: impl Into<String>,
        context: Value,
        meta: Option<Value>,
    ) {
        if let Some(Err(e)) = self.emit(level, message.into(), meta, Some(context)) {
            report_failure(level, &e);
        }
    }

    /// Like [`Logger::log`], but a failed write is returned to the caller.
    ///
    /// Resolves immediately when the level is gated out. The write runs on
    /// the calling task.
    pub async fn log_async(
        &self,
        level: Level,
        message: impl Into<String>,
        meta: Option<Value>,
    ) -> LoggerResult<()> {
        match self.emit(level, message.into(), meta, None) {
            Some(Err(e)) => Err(LoggerError::BackendWriteFailure(e)),
            _ => Ok(()),
        }
    }

    pub fn error(&self, message: impl Into<String>, meta: Option<Value>) {
        self.log(Level::Error, message, meta)
    }

    pub fn warn(&self, message: impl Into<String>, meta: Option<Value>) {
        self.log(Level::Warn, message, meta)
    }

    pub fn info(&self, message: impl Into<String>, meta: Option<Value>) {
        self.log(Level::Info, message, meta)
    }

    pub fn debug(&self, message: impl Into<String>, meta: Option<Value>) {
        self.log(Level::Debug, message, meta)
    }

    pub fn verbose(&self, message: impl Into<String>, meta: Option<Value>) {
        self.log(Level::Verbose, message, meta)
    }

    pub fn silly(&self, message: impl Into<String>, meta: Option<Value>) {
        self.log(Level::Silly, message, meta)
    }

    /// HTTP access-log middleware bound to this logger.
    pub fn middleware(self: &Arc<Self>) -> RequestLoggerLayer {
        RequestLoggerLayer::new(Arc::clone(self))
    }

    /// Returns `None` when gated out, otherwise the backend result.
    fn emit(
        &self,
        level: Level,
        message: String,
        meta: Option<Value>,
        context: Option<Value>,
    ) -> Option<Result<(), BackendError>> {
        if !self.is_enabled(level) {
            return None;
        }

        let format = self
            .custom_format
            .load_full()
            .map(|format| self.sanitizer.sanitize_map(&format));
        let mut record = LogRecord::new(level, message, merge_format(meta, format.as_ref()));
        if let Some(meta) = record.meta.as_mut() {
            self.sanitizer.sanitize_in_place(meta);
        }
        if let Some(mut context) = context {
            self.sanitizer.sanitize_in_place(&mut context);
            record.context = Some(context);
        }

        Some(self.write(record, format.as_ref()))
    }

    fn write(&self, record: LogRecord, format: Option<&Map<String, Value>>) -> Result<(), BackendError> {
        let line = self.formatter.format(&record, format)?;
        self.backend.write(&LogEntry { record, line })
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("custom_format", &self.custom_format())
            .field("sanitizer", &self.sanitizer)
            .finish_non_exhaustive()
    }
}

/// Overlay custom-format fields onto object metadata.
///
/// Without metadata the format itself becomes the metadata. Non-object
/// metadata is left as is; the formatter still applies the overrides.
fn merge_format(meta: Option<Value>, format: Option<&Map<String, Value>>) -> Option<Value> {
    let Some(format) = format else {
        return meta;
    };
    match meta {
        None | Some(Value::Null) => Some(Value::Object(format.clone())),
        Some(Value::Object(mut map)) => {
            for (key, value) in format {
                map.insert(key.clone(), value.clone());
            }
            Some(Value::Object(map))
        }
        Some(other) => Some(other),
    }
}

fn report_failure(level: Level, error: &BackendError) {
    tracing::error!(level = %level, error = %error, "Failed to write log record");
}
