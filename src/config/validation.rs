//! Configuration validation.
//!
//! Runs once at startup, after command-line overrides are applied.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("connection.host must not be empty")]
    EmptyHost,
    #[error("connection.port must be between 1 and 65535")]
    InvalidPort,
    #[error("connection.max_line_len must be greater than 0")]
    ZeroLineLength,
    #[error("console.event_queue must be greater than 0")]
    ZeroEventQueue,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.connection.host.as_deref().is_some_and(|h| h.trim().is_empty()) {
        errors.push(ValidationError::EmptyHost);
    }
    if config.connection.port == Some(0) {
        errors.push(ValidationError::InvalidPort);
    }
    if config.connection.max_line_len == 0 {
        errors.push(ValidationError::ZeroLineLength);
    }
    // mpsc::channel panics on zero capacity
    if config.console.event_queue == 0 {
        errors.push(ValidationError::ZeroEventQueue);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
