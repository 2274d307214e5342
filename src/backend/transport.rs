//! Console and rotating-file transports.
//!
//! # Sinks
//! - Console: `timestamp [level]: message`, colorized per level
//! - Combined file: every record at `info` or more severe, rotated daily,
//!   14 files retained
//! - Error file: `error` records only, rotated daily
//!
//! # Design Decisions
//! - Each transport has a maximum level and filters independently
//! - File writers sit behind a `Mutex`, so concurrent writers never interleave lines
//! - Rotation and retention are delegated to `tracing-appender`

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::backend::{Backend, LogEntry};
use crate::config::LoggerConfig;
use crate::error::BackendError;
use crate::format::Formatter;
use crate::levels::Level;

enum Sink {
    Console { colorize: bool },
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// A single output destination with its own level filter.
pub struct Transport {
    name: String,
    max_level: Level,
    sink: Sink,
}

impl Transport {
    /// Stdout transport accepting every level.
    pub fn console(colorize: bool) -> Self {
        Self {
            name: "console".to_string(),
            max_level: Level::Silly,
            sink: Sink::Console { colorize },
        }
    }

    /// Transport writing JSON lines into any writer.
    pub fn writer(name: impl Into<String>, max_level: Level, writer: impl Write + Send + 'static) -> Self {
        Self {
            name: name.into(),
            max_level,
            sink: Sink::Writer(Mutex::new(Box::new(writer))),
        }
    }

    /// Daily rotating file named `<date>.<suffix>` inside `directory`.
    pub fn rolling_file(
        name: impl Into<String>,
        directory: &Path,
        suffix: &str,
        max_level: Level,
        max_files: Option<usize>,
    ) -> io::Result<Self> {
        let mut builder = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_suffix(suffix);
        if let Some(max_files) = max_files {
            builder = builder.max_log_files(max_files);
        }
        let appender = builder.build(directory).map_err(io::Error::other)?;
        Ok(Self::writer(name, max_level, appender))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_level(&self) -> Level {
        self.max_level
    }

    /// Returns true if this transport takes records at `level`.
    pub fn accepts(&self, level: Level) -> bool {
        level.is_enabled_at(self.max_level)
    }

    fn write(&self, entry: &LogEntry) -> Result<(), BackendError> {
        match &self.sink {
            Sink::Console { colorize } => {
                let line = Formatter::new().console_line(&entry.record, *colorize);
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", line)?;
            }
            Sink::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
                writeln!(writer, "{}", entry.line)?;
                writer.flush()?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("name", &self.name)
            .field("max_level", &self.max_level)
            .finish()
    }
}

/// Fans entries out to every transport whose filter accepts them.
#[derive(Debug)]
pub struct TransportBackend {
    transports: Vec<Transport>,
    level: AtomicU8,
}

impl TransportBackend {
    pub fn new(transports: Vec<Transport>) -> Self {
        Self {
            transports,
            level: AtomicU8::new(Level::Silly.rank()),
        }
    }

    /// Build the console and file transports described by `config`.
    ///
    /// Creates the log directory if needed.
    pub fn from_config(config: &LoggerConfig) -> io::Result<Self> {
        let mut transports = Vec::new();

        if config.console.enabled {
            transports.push(Transport::console(config.console.colorize));
        }

        if config.files.enabled {
            let directory = Path::new(&config.files.directory);
            std::fs::create_dir_all(directory)?;
            for (name, file) in [("combined", &config.files.combined), ("error", &config.files.error)] {
                if file.enabled {
                    transports.push(Transport::rolling_file(
                        name,
                        directory,
                        &file.suffix,
                        file.level,
                        file.max_files,
                    )?);
                }
            }
        }

        tracing::info!(
            transports = ?transports.iter().map(Transport::name).collect::<Vec<_>>(),
            "Transports configured"
        );
        Ok(Self::new(transports))
    }

    pub fn transports(&self) -> &[Transport] {
        &self.transports
    }

    /// Logger threshold last reported through [`Backend::set_level`].
    /// Informational only; gating belongs to the logger.
    pub fn level(&self) -> Level {
        Level::from_rank(self.level.load(Ordering::Acquire)).unwrap_or_default()
    }
}

impl Backend for TransportBackend {
    /// Every accepting transport is attempted; the first error is returned.
    fn write(&self, entry: &LogEntry) -> Result<(), BackendError> {
        let mut first_error = None;
        for transport in self.transports.iter().filter(|t| t.accepts(entry.level())) {
            if let Err(e) = transport.write(entry) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn set_level(&self, level: Level) {
        self.level.store(level.rank(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LogRecord;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn entry(level: Level, message: &str) -> LogEntry {
        LogEntry {
            record: LogRecord::new(level, message, None),
            line: format!("{{\"message\":\"{message}\"}}"),
        }
    }

    #[test]
    fn test_level_filters_per_transport() {
        let combined = SharedBuf::default();
        let errors = SharedBuf::default();
        let backend = TransportBackend::new(vec![
            Transport::writer("combined", Level::Info, combined.clone()),
            Transport::writer("error", Level::Error, errors.clone()),
        ]);

        backend.write(&entry(Level::Info, "started")).unwrap();
        backend.write(&entry(Level::Error, "crashed")).unwrap();
        backend.write(&entry(Level::Debug, "chatter")).unwrap();

        let combined = combined.contents();
        assert!(combined.contains("started"));
        assert!(combined.contains("crashed"));
        assert!(!combined.contains("chatter"));

        let errors = errors.contents();
        assert!(errors.contains("crashed"));
        assert!(!errors.contains("started"));
    }

    #[test]
    fn test_reported_level_does_not_filter() {
        let buf = SharedBuf::default();
        let backend = TransportBackend::new(vec![Transport::writer("all", Level::Silly, buf.clone())]);
        backend.set_level(Level::Error);
        assert_eq!(backend.level(), Level::Error);

        backend.write(&entry(Level::Debug, "passed by the logger")).unwrap();
        assert!(buf.contents().contains("passed by the logger"));
    }

    #[test]
    fn test_write_error_reported_after_all_sinks() {
        let buf = SharedBuf::default();
        let backend = TransportBackend::new(vec![
            Transport::writer("broken", Level::Silly, BrokenWriter),
            Transport::writer("ok", Level::Silly, buf.clone()),
        ]);

        let err = backend.write(&entry(Level::Info, "partial")).unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(buf.contents().contains("partial"));
    }

    #[test]
    fn test_rolling_file_transport() {
        let dir = tempfile::tempdir().unwrap();
        let transport =
            Transport::rolling_file("combined", dir.path(), "combined.log", Level::Info, Some(14)).unwrap();
        let backend = TransportBackend::new(vec![transport]);
        backend.write(&entry(Level::Info, "on disk")).unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("combined.log"), "{name}");
        assert!(std::fs::read_to_string(&files[0]).unwrap().contains("on disk"));
    }
}
