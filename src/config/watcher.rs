//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::LoggerConfig;
use crate::logger::Logger;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<LoggerConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<LoggerConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        match load_config(&path) {
                            Ok(new_config) => {
                                let _ = tx.send(new_config);
                            }
                            Err(e) => {
                                tracing::error!("Failed to reload config: {}. Keeping current configuration.", e);
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Apply the hot-reloadable parts of `config` to a running logger.
///
/// A rejected value leaves the logger's current setting in place.
pub fn apply_reload(logger: &Logger, config: &LoggerConfig) {
    if let Err(e) = logger.set_level(&config.level) {
        tracing::warn!(error = %e, "Ignoring reloaded log level");
    }

    match &config.custom_format {
        Some(format) => {
            if let Err(e) = logger.set_custom_format(Value::Object(format.clone())) {
                tracing::warn!(error = %e, "Ignoring reloaded custom format");
            }
        }
        None => logger.clear_custom_format(),
    }

    tracing::info!(level = %logger.level(), "Logger configuration reloaded");
}
