//! Application configuration module
//!
//! This module centralizes all application configuration settings using `confy`
//! for automatic serialization and OS-specific config directory management.

use crate::constant::{
    APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, DEFAULT_API_URL, DEFAULT_MODEL,
};
use crate::diff::{DEFAULT_MAX_EDIT_COST, DiffOptions};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Config {
    pub settings: Settings,
    /// Explicit file location; `None` uses the platform config directory
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = confy::load(APP_NAME, None)?;
        info!("Load config from {:?}", Self::config_path()?);
        Ok(Self {
            settings,
            path: None,
        })
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let settings: Settings = confy::load_path(&path)?;
        info!("Load config from {:?}", path);
        Ok(Self {
            settings,
            path: Some(path),
        })
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        match &self.path {
            Some(path) => {
                confy::store_path(path, &self.settings)?;
                info!("Save config to {:?}", path);
            }
            None => {
                confy::store(APP_NAME, None, &self.settings)?;
                info!("Save config to {:?}", Self::config_path()?);
            }
        }
        Ok(())
    }

    /// Get the application data directory
    /// Falls back to a local "data" directory if platform dirs are unavailable
    pub fn data_dir(&self) -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME) {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from("data")
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            max_edit_cost: self.settings.diff.max_edit_cost,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self {
                settings: Settings::default(),
                path: None,
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Revision API configuration
    #[serde(default)]
    pub reviewer: ReviewerConfig,

    /// Scale applied to the text panels' font size
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,

    /// Comparison engine tuning
    #[serde(default)]
    pub diff: DiffConfig,
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reviewer: ReviewerConfig::default(),
            font_scale: default_font_scale(),
            diff: DiffConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerConfig {
    /// API key for the Gemini service, kept only in the local config file
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the models endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name used for revisions
    #[serde(default = "default_model")]
    pub model_name: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for ReviewerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            model_name: default_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Upper bound on the D-loop of a single middle-snake search
    #[serde(default = "default_max_edit_cost")]
    pub max_edit_cost: usize,
}

fn default_max_edit_cost() -> usize {
    DEFAULT_MAX_EDIT_COST
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_edit_cost: default_max_edit_cost(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use uuid::Uuid;

    fn temp_config_path() -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("test_config_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        (dir.join("revitlegis.toml"), dir)
    }

    #[test]
    fn defaults_point_at_gemini() {
        let settings = Settings::default();
        assert!(settings.reviewer.api_key.is_empty());
        assert_eq!(settings.reviewer.api_url, DEFAULT_API_URL);
        assert_eq!(settings.reviewer.model_name, DEFAULT_MODEL);
        assert_eq!(settings.font_scale, 1.0);
        assert_eq!(settings.diff.max_edit_cost, DEFAULT_MAX_EDIT_COST);
    }

    #[test]
    fn save_and_reload_from_path() {
        let (path, dir) = temp_config_path();

        let mut config = Config::load_from(&path).unwrap();
        config.settings.reviewer.api_key = "chave-de-teste".to_string();
        config.settings.font_scale = 1.3;
        config.save().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.settings.reviewer.api_key, "chave-de-teste");
        assert_eq!(reloaded.settings.font_scale, 1.3);
        assert_eq!(reloaded.diff_options(), DiffOptions::default());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let (path, dir) = temp_config_path();
        fs::write(&path, "[reviewer]\napi_key = \"abc\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.reviewer.api_key, "abc");
        assert_eq!(config.settings.reviewer.model_name, DEFAULT_MODEL);
        assert_eq!(config.settings.font_scale, 1.0);

        let _ = fs::remove_dir_all(dir);
    }
}
