//! Error handling module for the gcmt CLI.
//!
//! This module provides custom error types using `thiserror` for structured
//! error handling throughout the application.

use gcmon::GcmonError;
use thiserror::Error;

/// Main error type for the gcmt CLI application.
#[derive(Error, Debug)]
pub enum GcmtError {
    /// Error when configuration cannot be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when input validation fails.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error raised by the monitor core.
    #[error(transparent)]
    Monitor(#[from] GcmonError),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using GcmtError.
pub type Result<T> = std::result::Result<T, GcmtError>;
