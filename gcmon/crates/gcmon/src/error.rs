//! Error Module - gcmon Error Types
//!
//! Defines all error types used in gcmon.
//!
//! # Error Categories
//!
//! ## Command Errors
//! - `UnknownCommand` - No registered command answers to a label
//! - `DuplicateAlias` - Two commands claim the same alias
//! - `InvalidArgument` - Malformed command or builder input
//!
//! ## Delivery Errors
//! - `QueueFull` - Bounded report queue rejected a task
//! - `ExecutorStopped` - Task submitted after executor shutdown
//! - `Spawn` - Worker thread could not be started
//! - `Timeout` - Worker did not catch up in time
//!
//! ## Configuration Errors
//! - `Configuration` - Invalid configuration

use thiserror::Error;

/// Main error type for all gcmon operations
///
/// # Examples
///
/// ```rust
/// use gcmon::error::GcmonError;
///
/// fn describe(err: &GcmonError) -> &'static str {
///     match err {
///         GcmonError::UnknownCommand { .. } => "no such command",
///         GcmonError::QueueFull { .. } => "report dropped",
///         _ => "other",
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum GcmonError {
    /// Configuration error
    ///
    /// **When returned:** `MonitorConfig::validate` rejected a value
    ///
    /// **Recovery strategy:** Use default configuration or fail fast
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid argument
    ///
    /// **When returned:** A command builder is missing aliases or an executor
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No command registered under the given label
    #[error("Unknown command: {label}")]
    UnknownCommand { label: String },

    /// A second command tried to claim an alias already in use
    #[error("Alias '{alias}' is already registered")]
    DuplicateAlias { alias: String },

    /// Bounded report queue is full
    ///
    /// **When returned:** The notification thread produced reports faster than
    /// the worker could deliver them
    ///
    /// **Recovery strategy:** Drop the report; the next event is unaffected
    #[error("Report queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// Executor no longer accepts tasks
    #[error("Task executor has been shut down")]
    ExecutorStopped,

    /// Worker thread could not be spawned
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Operation timeout
    ///
    /// **When returned:** `SerialExecutor::flush` waited longer than allowed
    ///
    /// **Recovery strategy:** Retry with a longer timeout; queued tasks still run
    #[error("Operation timeout: {0}")]
    Timeout(String),
}

impl GcmonError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors affect a single report or command; the monitor keeps
    /// running.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GcmonError::QueueFull { .. }
                | GcmonError::UnknownCommand { .. }
                | GcmonError::InvalidArgument(_)
                | GcmonError::Timeout(_)
        )
    }
}

/// Result type alias for gcmon operations
pub type Result<T> = std::result::Result<T, GcmonError>;
