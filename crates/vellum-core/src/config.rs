//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/vellum/config.toml)
//! 3. Environment variables (VELLUM_* prefix)
//!
//! Environment variables take precedence over config file values. The
//! text format catalog is derived from the configured base font size.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::text::FormatCatalog;

/// Environment variable prefix
const ENV_PREFIX: &str = "VELLUM";

/// Smallest usable base font size
const MIN_FONT_SIZE: f32 = 5.0;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base font size the format presets are derived from
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Seconds between autosave ticks
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            autosave_interval_secs: default_autosave_interval(),
        }
    }
}

impl Config {
    /// Load configuration from the default location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides. If the file
    /// doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config: Config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.clamp_values();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        config.clamp_values();
        Ok(config)
    }

    /// Build the format catalog for the configured font size
    pub fn catalog(&self) -> FormatCatalog {
        FormatCatalog::new(self.font_size)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // VELLUM_FONT_SIZE
        if let Ok(val) = std::env::var(format!("{}_FONT_SIZE", ENV_PREFIX)) {
            if let Ok(size) = val.parse() {
                self.font_size = size;
            }
        }

        // VELLUM_AUTOSAVE_INTERVAL
        if let Ok(val) = std::env::var(format!("{}_AUTOSAVE_INTERVAL", ENV_PREFIX)) {
            if let Ok(secs) = val.parse() {
                self.autosave_interval_secs = secs;
            }
        }
    }

    fn clamp_values(&mut self) {
        if self.font_size < MIN_FONT_SIZE {
            self.font_size = MIN_FONT_SIZE;
        }
        if self.autosave_interval_secs == 0 {
            self.autosave_interval_secs = default_autosave_interval();
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with the VELLUM_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vellum")
            .join("config.toml")
    }
}

fn default_font_size() -> f32 {
    13.0
}

fn default_autosave_interval() -> u64 {
    30
}
