//! Configuration module for the gcmt CLI.
//!
//! This module handles loading, saving, and validating the settings of the
//! simulated host and of the embedded monitor.

use dirs::{config_dir, home_dir};
use gcmon::MonitorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GcmtError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "gcmt.toml";

/// Application configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Report delivery settings of the monitor.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Simulated host settings.
    #[serde(default)]
    pub host: HostConfig,
}

/// Settings of the simulated host runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    /// Milliseconds between simulated collections.
    pub interval_ms: u64,

    /// Seed of the workload generator; random when unset.
    pub seed: Option<u64>,

    /// Share of collections that are major (0.0 - 1.0).
    pub major_ratio: f64,

    /// Whether the host delivers GC notifications at all.
    pub notifications: bool,

    /// Name of the young generation collector.
    pub young_collector: String,

    /// Name of the old generation collector.
    pub old_collector: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            interval_ms: 250,
            seed: None,
            major_ratio: 0.1,
            notifications: true,
            young_collector: "G1 Young Generation".to_string(),
            old_collector: "G1 Old Generation".to_string(),
        }
    }
}

impl HostConfig {
    /// Validate host settings.
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(GcmtError::Validation(
                "host.interval_ms must be > 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.major_ratio) {
            return Err(GcmtError::Validation(format!(
                "host.major_ratio must be between 0 and 1, got {}",
                self.major_ratio
            )));
        }

        if self.young_collector.trim().is_empty() || self.old_collector.trim().is_empty() {
            return Err(GcmtError::Validation(
                "collector names must not be empty".to_string(),
            ));
        }

        if self.young_collector == self.old_collector {
            return Err(GcmtError::Validation(format!(
                "young and old collector share the name '{}'",
                self.young_collector
            )));
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GcmtError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| GcmtError::Config(format!("Failed to parse configuration: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| GcmtError::Config(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `GCMON_*` environment overrides to the monitor section.
    pub fn with_env_overrides(mut self) -> Self {
        self.monitor = self.monitor.with_env_overrides();
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.monitor
            .validate()
            .map_err(|e| GcmtError::Config(e.to_string()))?;
        self.host.validate()
    }

    /// Check for config in current directory.
    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    /// Check for config in home directory.
    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("gcmt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Check for config in system config directory.
    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("gcmt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}
