//! Uncaught-exception sink.
//!
//! Installs a panic hook that appends an `error` record to a fixed file and
//! then chains to the previously installed hook.

use std::any::Any;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::panic::{self, PanicHookInfo};
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::BackendError;
use crate::format::{Formatter, LogRecord};
use crate::levels::Level;

/// Appends panic records to a single file.
#[derive(Debug, Clone)]
pub struct ExceptionSink {
    path: PathBuf,
}

impl ExceptionSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one formatted record, creating parent directories as needed.
    pub fn append(&self, record: &LogRecord) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line = Formatter::new().format(record, None)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Route every panic through this sink.
    ///
    /// Call once at startup; the previous hook still runs afterwards.
    pub fn install(self) {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            if let Err(e) = self.append(&panic_record(info)) {
                let _ = writeln!(std::io::stderr(), "failed to record panic: {}", e);
            }
            previous(info);
        }));
        tracing::debug!("Exception sink installed");
    }
}

fn panic_record(info: &PanicHookInfo<'_>) -> LogRecord {
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
    let thread = std::thread::current().name().map(str::to_string);
    exception_record(&payload_message(info.payload()), location, thread)
}

fn exception_record(message: &str, location: Option<String>, thread: Option<String>) -> LogRecord {
    LogRecord::new(
        Level::Error,
        format!("uncaught exception: {}", message),
        Some(json!({
            "location": location,
            "thread": thread,
        })),
    )
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
