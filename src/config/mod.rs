//! Configuration loading and management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::progress::{DEFAULT_GOAL_TEMPLATES, GoalTemplate};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Daily goal set handed out on each rollover
    #[serde(default = "default_goals")]
    pub goals: Vec<GoalTemplate>,

    /// General settings
    #[serde(default)]
    pub settings: Settings,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Quiet period before a debounced profile write commits, in seconds
    #[serde(default = "default_quiet_period_secs")]
    pub quiet_period_secs: u64,

    /// Override for the profile database path
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

fn default_goals() -> Vec<GoalTemplate> {
    DEFAULT_GOAL_TEMPLATES.clone()
}

fn default_quiet_period_secs() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            goals: default_goals(),
            settings: Settings::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quiet_period_secs: default_quiet_period_secs(),
            store_path: None,
        }
    }
}

impl Config {
    /// Get the global config directory path (~/.studykit/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".studykit")
    }

    /// Get the global config file path (~/.studykit/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the configuration the binary runs with.
    ///
    /// An explicit path must exist; the default path falls back to built-in
    /// defaults when missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::global_config_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration with an atomic write (temp file + rename)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        let tmp_path = path.with_extension("toml.tmp");
        std::fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config file: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to move config into place: {}", path.display()))?;
        Ok(())
    }

    /// Resolved profile database path
    pub fn store_path(&self) -> PathBuf {
        self.settings
            .store_path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("profiles.db"))
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_secs(self.settings.quiet_period_secs)
    }
}
