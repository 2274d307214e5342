//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoggerConfig (validated)
//!     → Logger::from_config + TransportBackend::from_config
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new LoggerConfig sent over a channel
//!     → level and custom format applied to the running logger
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Only level and custom format are hot-reloadable; transports are fixed at startup

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{ConsoleConfig, FilesConfig, HttpConfig, LoggerConfig, RotatingFileConfig, ServerConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::{apply_reload, ConfigWatcher};
