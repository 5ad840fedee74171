//! Window and logging settings.
//!
//! Settings are read from `config.json` inside the platform config directory.
//! Missing fields fall back to their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "rectscene".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Location of the config file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rectscene").join("config.json"))
    }

    /// Loads the config from [`Config::default_path`], or the defaults if there is no file.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads the config from the given file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Parses [`Config::log_level`], falling back to `Info` for unknown names.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
