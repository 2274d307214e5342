//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::DEFAULT_MAX_BODY_BYTES;
use crate::levels::Level;
use crate::sanitize::DEFAULT_SENSITIVE_FIELDS;

/// Root configuration for the logger.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Initial threshold level name.
    pub level: String,

    /// Field names stripped from every record.
    pub sensitive_fields: Vec<String>,

    /// Fields pre-populated on every record.
    pub custom_format: Option<Map<String, Value>>,

    /// Console transport.
    pub console: ConsoleConfig,

    /// Rotating file transports.
    pub files: FilesConfig,

    /// Request middleware settings.
    pub http: HttpConfig,

    /// Demo server settings.
    pub server: ServerConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::default().name().to_string(),
            sensitive_fields: DEFAULT_SENSITIVE_FIELDS.iter().map(|f| f.to_string()).collect(),
            custom_format: None,
            console: ConsoleConfig::default(),
            files: FilesConfig::default(),
            http: HttpConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Console transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,

    /// Color the level name per the level registry.
    pub colorize: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colorize: true,
        }
    }
}

/// File transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    pub enabled: bool,

    /// Directory holding every log file.
    pub directory: String,

    /// All records at `info` or more severe.
    pub combined: RotatingFileConfig,

    /// `error` records only.
    pub error: RotatingFileConfig,

    /// Panic records, relative to `directory`.
    pub exceptions_file: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: "logs".to_string(),
            combined: RotatingFileConfig {
                enabled: true,
                suffix: "combined.log".to_string(),
                level: Level::Info,
                max_files: Some(14),
            },
            error: RotatingFileConfig {
                enabled: true,
                suffix: "error.log".to_string(),
                level: Level::Error,
                max_files: None,
            },
            exceptions_file: "exceptions.log".to_string(),
        }
    }
}

/// A daily rotating file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RotatingFileConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// File name after the date, e.g. `combined.log` → `2024-01-31.combined.log`.
    pub suffix: String,

    /// Least severe level written to this file.
    pub level: Level,

    /// Rotated files kept (`None` = unlimited).
    #[serde(default)]
    pub max_files: Option<usize>,
}

fn default_enabled() -> bool {
    true
}

/// Request middleware configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Largest request body captured into access records.
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Demo server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}
