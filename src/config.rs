//! Configuration for walkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, WalKvError};

/// Main configuration for a walkv store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory fresh logs are created in.
    /// Internal structure:
    ///   {log_dir}/
    ///     └── {log_prefix}{uuid}   (one log per store)
    pub log_dir: PathBuf,

    /// Filename prefix for freshly created logs
    pub log_prefix: String,

    // -------------------------------------------------------------------------
    // Recovery Configuration
    // -------------------------------------------------------------------------
    /// Truncate an unacknowledged trailing fragment after replay so the next
    /// append starts on a record boundary
    pub repair_torn_tail: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("."),
            log_prefix: Self::DEFAULT_LOG_PREFIX.to_string(),
            repair_torn_tail: true,
        }
    }
}

impl Config {
    pub const DEFAULT_LOG_PREFIX: &'static str = "wal-";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config can produce a valid log path
    pub fn validate(&self) -> Result<()> {
        if self.log_dir.as_os_str().is_empty() {
            return Err(WalKvError::Config("log_dir must not be empty".to_string()));
        }
        if self.log_prefix.contains(std::path::is_separator) {
            return Err(WalKvError::Config(format!(
                "log_prefix {:?} must not contain a path separator",
                self.log_prefix
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the directory new logs are created in
    pub fn log_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_dir = path.into();
        self
    }

    /// Set the filename prefix for new logs
    pub fn log_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.log_prefix = prefix.into();
        self
    }

    /// Enable or disable torn tail repair during recovery
    pub fn repair_torn_tail(mut self, repair: bool) -> Self {
        self.config.repair_torn_tail = repair;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
