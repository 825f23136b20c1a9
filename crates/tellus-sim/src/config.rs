//! World configuration, loaded from TOML.
//!
//! ```toml
//! seed = 7
//!
//! [[triggers]]
//! type = "LocalEarthquake"
//! k = 0.02
//!
//! [[triggers]]
//! type = "EndOfTheWorld"
//! target_tick = 1000
//! ```
//!
//! Every field is optional. A config with no `triggers` key gets the standard
//! set with default calibration; an explicit empty list registers nothing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use tellus_core::constants::DEFAULT_SEED;

pub use crate::trigger::{
    AshCloudConfig, DroughtConfig, EarthquakeConfig, EmptyConfig, EndOfTheWorldConfig,
    TriggerConfig,
};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("failed to parse config TOML: {source}")]
    Toml {
        /// The underlying TOML parse error.
        source: toml::de::Error,
    },

    /// Parsed, but holds values no trigger can run with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(source: toml::de::Error) -> Self {
        Self::Toml { source }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed of the world's random stream. Same seed, same world.
    pub seed: u64,
    /// Triggers to register, in evaluation order.
    pub triggers: Vec<TriggerConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            triggers: TriggerConfig::standard_set(),
        }
    }
}

impl SimConfig {
    /// A config with the given seed and no triggers.
    pub fn bare(seed: u64) -> Self {
        Self {
            seed,
            triggers: Vec::new(),
        }
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the string is not valid TOML for this
    /// schema, or [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SimConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, trigger) in self.triggers.iter().enumerate() {
            trigger
                .validate()
                .map_err(|reason| ConfigError::Invalid(format!("triggers[{i}] ({}): {reason}", trigger.kind())))?;
        }
        Ok(())
    }
}
