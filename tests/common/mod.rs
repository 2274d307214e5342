//! Shared utilities for integration tests.

use std::sync::Arc;

use service_logger::{Level, Logger, MemoryBackend};

/// Logger at `level` writing into an inspectable in-memory backend.
pub fn memory_logger(level: Level) -> (Arc<Logger>, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let logger = Arc::new(Logger::new(backend.clone()).with_level(level));
    (logger, backend)
}

/// Files in `dir` whose name ends with `suffix`.
#[allow(dead_code)]
pub fn files_ending_with(dir: &std::path::Path, suffix: &str) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.file_name().unwrap().to_string_lossy().ends_with(suffix))
        .collect()
}
