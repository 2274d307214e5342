//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Level names must exist in the registry
//! - File transports need a directory and non-empty names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::LoggerConfig;
use crate::levels::Level;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown log level '{0}'")]
    UnknownLevel(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("sensitive field names must not be empty")]
    EmptySensitiveField,
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.level.parse::<Level>().is_err() {
        errors.push(ValidationError::UnknownLevel(config.level.clone()));
    }

    if config.sensitive_fields.iter().any(|f| f.is_empty()) {
        errors.push(ValidationError::EmptySensitiveField);
    }

    if config.files.enabled {
        if config.files.directory.is_empty() {
            errors.push(ValidationError::Empty("files.directory"));
        }
        if config.files.exceptions_file.is_empty() {
            errors.push(ValidationError::Empty("files.exceptions_file"));
        }
        let files = [
            (&config.files.combined, "files.combined.suffix", "files.combined.max_files"),
            (&config.files.error, "files.error.suffix", "files.error.max_files"),
        ];
        for (file, suffix_field, max_files_field) in files {
            if !file.enabled {
                continue;
            }
            if file.suffix.is_empty() {
                errors.push(ValidationError::Empty(suffix_field));
            }
            if file.max_files == Some(0) {
                errors.push(ValidationError::Zero(max_files_field));
            }
        }
    }

    if config.http.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("http.max_body_bytes"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
