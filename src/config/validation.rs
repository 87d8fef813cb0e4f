//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the log directory exists before the server accepts traffic
//! - Validate value ranges (non-empty host, sane limits)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: CollectorConfig → Result<(), Vec<_>>
//! - Runs once at startup, before the listener is bound

use std::fmt;

use crate::config::schema::CollectorConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyHost,
    LogDirectoryMissing(String),
    ZeroBodyLimit,
    EmptyIdentityCookie,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyHost => write!(f, "listener host must not be empty"),
            ValidationError::LogDirectoryMissing(path) => {
                write!(f, "log directory {path:?} does not exist")
            }
            ValidationError::ZeroBodyLimit => write!(f, "max_body_bytes must be greater than 0"),
            ValidationError::EmptyIdentityCookie => {
                write!(f, "identity cookie name must not be empty when enabled")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &CollectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    if let Some(directory) = &config.log_directory {
        if !directory.is_dir() {
            errors.push(ValidationError::LogDirectoryMissing(
                directory.display().to_string(),
            ));
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.identity.enabled && config.identity.cookie_name.trim().is_empty() {
        errors.push(ValidationError::EmptyIdentityCookie);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
