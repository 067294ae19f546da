//! Configuration management for absentia.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.
//!
//! The reporting-period list and the `NA` sentinel are deliberately not
//! configurable; they are fixed at process start.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default application directory name.
const APP_DIR_NAME: &str = "absentia";

/// Fixed relative location of the source dataset.
const DATASET_FILE_NAME: &str = "data/district_data.csv";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ABSENTIA_`)
/// 2. TOML config file at `~/.config/absentia/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset configuration.
    pub dataset: DatasetConfig,
    /// Dashboard UI configuration.
    pub ui: UiConfig,
}

/// Dataset-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the dataset file.
    /// Defaults to the relative path `data/district_data.csv`.
    pub path: Option<PathBuf>,
}

/// Dashboard UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Event-loop tick interval in milliseconds.
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_ms: 100 }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("ABSENTIA_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.ui.tick_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "tick_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Get the dataset path, resolving the default relative location if
    /// not set.
    #[must_use]
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DATASET_FILE_NAME))
    }

    /// Get the UI tick interval as a Duration.
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }
}
