// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration persistence (save/load).

use crate::config::PipelineConfig;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const CONFIG_FILE: &str = "senselog.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Manages configuration file persistence.
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a config manager rooted at the platform config directory.
    pub fn new() -> Result<Self, ConfigError> {
        let project_dirs =
            ProjectDirs::from("", "", "senselog").ok_or(ConfigError::NoConfigDir)?;

        Self::with_dir(project_dirs.config_dir())
    }

    /// Create a config manager rooted at `dir`, creating it if needed.
    pub fn with_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&config_dir)?;

        debug!("Config directory: {:?}", config_dir);
        Ok(Self { config_dir })
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Load the pipeline config, falling back to defaults when absent.
    pub fn load_config(&self) -> Result<PipelineConfig, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            debug!("No config found at {:?}, using defaults", path);
            return Ok(PipelineConfig::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = PipelineConfig::from_toml(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save the pipeline config.
    pub fn save_config(&self, config: &PipelineConfig) -> Result<(), ConfigError> {
        let path = self.config_path();
        fs::write(&path, config.to_toml()?)?;
        debug!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path()).unwrap();

        assert_eq!(manager.load_config().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path().join("nested")).unwrap();

        let mut config = PipelineConfig::default();
        config.channel.capacity = 32;
        config.sampler.interval_ms = 100;
        manager.save_config(&config).unwrap();

        assert!(manager.config_path().exists());
        assert_eq!(manager.load_config().unwrap(), config);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path()).unwrap();
        fs::write(manager.config_path(), "[channel]\ncapacity = \"ten\"\n").unwrap();

        assert!(matches!(manager.load_config(), Err(ConfigError::TomlParse(_))));
    }
}
