//! Configuration Module - Monitor Delivery Parameters
//!
//! Controls how GC reports are labelled and queued on their way from the
//! host's notification thread to the response sink.

use serde::{Deserialize, Serialize};

/// Main configuration for the GC monitor
///
/// # Examples
///
/// ```rust
/// use gcmon::MonitorConfig;
///
/// // Use default configuration
/// let config = MonitorConfig::default();
///
/// // Bounded queue with a custom prefix
/// let config = MonitorConfig {
///     message_prefix: "[gc] ".to_string(),
///     queue_capacity: Some(64),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Text prepended to prefixed messages when a sink renders them
    ///
    /// Default: `"[gcmon] "`
    pub message_prefix: String,

    /// Capacity of the report queue
    ///
    /// `None` keeps the queue unbounded. With `Some(n)`, reports produced while
    /// `n` are already waiting are dropped instead of blocking the host's
    /// notification thread.
    ///
    /// Default: unbounded
    pub queue_capacity: Option<usize>,

    /// Name given to the report worker thread
    ///
    /// Default: `"gcmon-report"`
    pub worker_thread_name: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            message_prefix: DEFAULT_PREFIX.to_string(),
            queue_capacity: None,
            worker_thread_name: DEFAULT_WORKER_NAME.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Validate configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gcmon::MonitorConfig;
    ///
    /// let config = MonitorConfig {
    ///     queue_capacity: Some(0),  // Invalid!
    ///     ..Default::default()
    /// };
    ///
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == Some(0) {
            return Err(ConfigError::InvalidQueueCapacity(
                "queue_capacity must be > 0 when set".to_string(),
            ));
        }

        if self.worker_thread_name.trim().is_empty() {
            return Err(ConfigError::InvalidWorkerName(
                "worker_thread_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Build configuration from environment variables
    ///
    /// Overrides defaults with environment variables:
    /// - GCMON_PREFIX
    /// - GCMON_QUEUE_CAPACITY (`0` or `unbounded` clears the bound)
    /// - GCMON_WORKER_NAME
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply the `GCMON_*` environment variables on top of `self`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("GCMON_PREFIX") {
            self.message_prefix = val;
        }

        if let Ok(val) = std::env::var("GCMON_QUEUE_CAPACITY") {
            if val.eq_ignore_ascii_case("unbounded") {
                self.queue_capacity = None;
            } else if let Ok(capacity) = val.parse::<usize>() {
                self.queue_capacity = (capacity > 0).then_some(capacity);
            }
        }

        if let Ok(val) = std::env::var("GCMON_WORKER_NAME") {
            if !val.trim().is_empty() {
                self.worker_thread_name = val;
            }
        }

        self
    }
}

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid queue capacity: {0}")]
    InvalidQueueCapacity(String),

    #[error("Invalid worker name: {0}")]
    InvalidWorkerName(String),
}

impl From<ConfigError> for crate::error::GcmonError {
    fn from(err: ConfigError) -> Self {
        crate::error::GcmonError::Configuration(err.to_string())
    }
}

const DEFAULT_PREFIX: &str = "[gcmon] ";
const DEFAULT_WORKER_NAME: &str = "gcmon-report";
