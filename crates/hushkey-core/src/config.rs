//! Configuration management for hushkey.
//!
//! The config file is the only durable state the application has. It is
//! written back on every user-initiated change, so process exit never has
//! anything to flush.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{APP_NAME, ToggleMode};

/// Menu language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
}

/// Configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Volume (0..=100) restored on key release in mute-while-pressed mode.
    #[serde(default = "default_restore_volume")]
    pub restore_volume: u8,

    /// Trigger key combination, e.g. "ctrl+shift+m".
    #[serde(default = "default_trigger_key")]
    pub trigger_key: String,

    /// Whether holding the trigger key mutes or unmutes.
    #[serde(default)]
    pub toggle_mode: ToggleMode,

    /// Menu language.
    #[serde(default)]
    pub language: Language,
}

fn default_restore_volume() -> u8 {
    50
}

fn default_trigger_key() -> String {
    "ctrl+shift+m".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            restore_volume: default_restore_volume(),
            trigger_key: default_trigger_key(),
            toggle_mode: ToggleMode::default(),
            language: Language::default(),
        }
    }
}

impl Config {
    /// Clamp out-of-range values a hand-edited file may contain.
    fn sanitize(&mut self) {
        if self.restore_volume > 100 {
            warn!(
                restore_volume = self.restore_volume,
                "restore_volume above 100, clamping"
            );
            self.restore_volume = 100;
        }
    }
}

/// Manages loading, saving, and reloading the configuration.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new `ConfigManager` with the default configuration directory.
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Creates a new `ConfigManager` with a specified configuration directory.
    /// Useful for testing with temporary directories.
    #[cfg(test)]
    pub fn with_config_dir<P: AsRef<std::path::Path>>(dir: P) -> Self {
        let config_path = dir.as_ref().join(format!("{APP_NAME}.toml"));
        Self { config_path }
    }

    /// Determines the default path to the configuration file using `dirs::config_dir`.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to retrieve configuration directory")?;
        Ok(config_dir.join(APP_NAME).join(format!("{APP_NAME}.toml")))
    }

    /// Loads the configuration from the config file.
    ///
    /// A missing file yields the defaults. An unparseable file also yields
    /// the defaults, logged once, rather than refusing to start; the next
    /// save rewrites it in valid form.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let config_content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file at {:?}", self.config_path))?;

        let mut config = match toml::from_str::<Config>(&config_content) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = ?self.config_path,
                    "Invalid config file, falling back to defaults: {e}"
                );
                Config::default()
            }
        };
        config.sanitize();
        Ok(config)
    }

    /// Reloads the configuration and returns `true` if there are changes.
    pub fn reload(&self, current_config: &mut Config) -> Result<bool> {
        let old_config = current_config.clone();
        *current_config = self.load()?;
        Ok(*current_config != old_config)
    }

    /// Saves the configuration to the config file.
    pub fn save(&self, config: &Config) -> Result<()> {
        let config_dir = self
            .config_path
            .parent()
            .with_context(|| format!("Failed to get parent directory of {:?}", self.config_path))?;

        // Ensure the configuration directory exists.
        fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory at {:?}", config_dir))?;

        let serialized =
            toml::to_string_pretty(&config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, serialized)
            .with_context(|| format!("Failed to write config file at {:?}", self.config_path))?;

        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path(&self) -> &std::path::Path {
        &self.config_path
    }
}
