//! Configuration management for DevFlix
//!
//! Handles config file loading/saving and API key lookup.
//! Config is stored at ~/.config/devflix/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::tmdb::DEFAULT_LANGUAGE;
use crate::storage::FileStorage;

/// Environment variable overriding the configured TMDB key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write config file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no TMDB API key: set TMDB_API_KEY or tmdb_api_key in the config file")]
    MissingApiKey,

    #[error("could not determine the config directory")]
    NoConfigDir,

    #[error("could not determine the data directory")]
    NoDataDir,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: Option<String>,
    /// Response language for catalog text (default pt-BR)
    pub language: Option<String>,
    /// Where favorites are kept (default ~/.local/share/devflix)
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/devflix/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("devflix").join("config.toml"))
    }

    /// Load from `explicit` or the default path. A missing file yields the
    /// default config; an unreadable or malformed one is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = explicit.map(Path::to_path_buf).or_else(Self::path) else {
            return Ok(Self::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!("Loaded config from {}", path.display());
                Ok(toml::from_str(&content)?)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Save to `explicit` or the default path, returning where it went
    pub fn save(&self, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(Self::path)
            .ok_or(ConfigError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(&path, toml)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(path)
    }

    /// TMDB key with fallback chain:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Key from config file
    pub fn tmdb_api_key(&self) -> Result<String, ConfigError> {
        Self::resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.tmdb_api_key.as_deref())
    }

    fn resolve_api_key(env: Option<String>, file: Option<&str>) -> Result<String, ConfigError> {
        env.filter(|k| !k.trim().is_empty())
            .or_else(|| file.filter(|k| !k.trim().is_empty()).map(str::to_string))
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Favorites storage rooted at the configured or default data directory
    pub fn storage(&self) -> Result<FileStorage, ConfigError> {
        let root = self
            .data_dir
            .clone()
            .or_else(FileStorage::default_root)
            .ok_or(ConfigError::NoDataDir)?;
        Ok(FileStorage::new(root))
    }
}
