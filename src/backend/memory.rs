//! In-memory backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::backend::{Backend, LogEntry};
use crate::error::BackendError;
use crate::levels::Level;

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<LogEntry>,
    failure: Option<String>,
    level: Option<Level>,
}

/// Captures every written entry in order.
///
/// A failure message can be armed to make subsequent writes fail with
/// [`BackendError::Rejected`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all entries written so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state().entries.clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.state()
            .entries
            .iter()
            .map(|e| e.message().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.state().entries.clear();
    }

    /// Make every following write fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.state().failure = Some(message.into());
    }

    /// Stop failing writes.
    pub fn recover(&self) {
        self.state().failure = None;
    }

    /// Last threshold announced by the logger.
    pub fn level(&self) -> Option<Level> {
        self.state().level
    }
}

impl Backend for MemoryBackend {
    fn write(&self, entry: &LogEntry) -> Result<(), BackendError> {
        let mut state = self.state();
        if let Some(message) = &state.failure {
            return Err(BackendError::Rejected(message.clone()));
        }
        state.entries.push(entry.clone());
        Ok(())
    }

    fn set_level(&self, level: Level) {
        self.state().level = Some(level);
    }
}
