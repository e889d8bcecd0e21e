//! Configuration for the databroker backend
//!
//! Centralized configuration with sensible defaults.

use crate::error::{BrokerError, Result};

/// Maximum length of a key, and therefore of a namespace name, in bytes
pub const MAX_KEY_LEN: usize = 1023;

/// Main configuration for a backend instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Namespace Configuration
    // -------------------------------------------------------------------------
    /// Longest namespace name accepted by `create` (bytes, at most MAX_KEY_LEN)
    pub max_name_len: usize,

    /// Number of registry slots to reserve up front
    pub registry_capacity: usize,

    // -------------------------------------------------------------------------
    // Completion Configuration
    // -------------------------------------------------------------------------
    /// Skip the refinement of non-terminal DIRECTORY completions
    ///
    /// When set, an in-progress baseline reached outside the terminal stage is
    /// returned as-is instead of being promoted to success.
    pub strict_stage_checks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_name_len: MAX_KEY_LEN,
            registry_capacity: 64,
            strict_stage_checks: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config for values the backend cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_name_len == 0 {
            return Err(BrokerError::Config(
                "max_name_len must be at least 1".to_string(),
            ));
        }
        if self.max_name_len > MAX_KEY_LEN {
            return Err(BrokerError::Config(format!(
                "max_name_len {} exceeds key limit {}",
                self.max_name_len, MAX_KEY_LEN
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
    /// Set the maximum namespace name length (in bytes)
    pub fn max_name_len(mut self, len: usize) -> Self {
        self.config.max_name_len = len;
        self
    }

    /// Set the number of registry slots reserved at startup
    pub fn registry_capacity(mut self, capacity: usize) -> Self {
        self.config.registry_capacity = capacity;
        self
    }

    /// Enable or disable strict stage checks for DIRECTORY completions
    pub fn strict_stage_checks(mut self, strict: bool) -> Self {
        self.config.strict_stage_checks = strict;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
