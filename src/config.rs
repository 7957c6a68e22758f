//! Configuration management for taskflow.
//!
//! This module handles the `~/.taskflow/config.yaml` file which stores
//! user settings: an optional database path override, the autosave and
//! pomodoro intervals used by `watch`, and the debug-logging flag.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Database path override. `None` uses `~/.taskflow/taskflow.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// Seconds of session time between automatic progress saves in `watch`.
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_secs: i64,

    /// Seconds of session time between break reminders in `watch`.
    #[serde(default = "default_pomodoro_interval")]
    pub pomodoro_interval_secs: i64,

    /// Whether to append task operations to the event log.
    #[serde(default)]
    pub debug_logging: bool,
}

const fn default_autosave_interval() -> i64 {
    5
}

const fn default_pomodoro_interval() -> i64 {
    crate::tasks::POMODORO_INTERVAL_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            autosave_interval_secs: default_autosave_interval(),
            pomodoro_interval_secs: default_pomodoro_interval(),
            debug_logging: false,
        }
    }
}

impl AppConfig {
    /// Load config from the default location, returning `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Option<Self>> {
        match crate::paths::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load config from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Save config to a specific file path, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the config, writing a default file first if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn ensure(path: &Path) -> Result<Self> {
        if let Some(config) = Self::load_from(path)? {
            return Ok(config);
        }
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }
}
