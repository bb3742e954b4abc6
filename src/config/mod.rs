//! # Configuration Management Module
//!
//! TOML-backed configuration for the TabQuest engine and CLI, with
//! validation, sensible defaults, and persistence.
//!
//! ## Configuration Structure
//!
//! - [`StorageConfig`] - Data persistence settings
//! - [`GameConfig`] - Event probabilities and reward thresholds
//! - [`LoggingConfig`] - Logging settings
//!
//! ## Configuration File Format
//!
//! ```toml
//! [storage]
//! data_dir = "data/tabquest"
//!
//! [game]
//! event_probability = 0.3
//! focus_event_probability = 0.05
//! min_tab_secs = 5
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::engine::GameSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Chance of an event appearing when a tab is opened. 0.0..=1.0.
    pub event_probability: f64,
    /// Chance of an event appearing when a tab is focused. 0.0..=1.0.
    #[serde(default = "default_focus_event_probability")]
    pub focus_event_probability: f64,
    /// Minimum open time, in seconds, for a closed tab to earn anything.
    #[serde(default = "default_min_tab_secs")]
    pub min_tab_secs: i64,
}

fn default_focus_event_probability() -> f64 {
    0.05
}

fn default_min_tab_secs() -> i64 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub game: GameConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.game.event_probability) {
            return Err(anyhow!(
                "game.event_probability must be within 0.0..=1.0, got {}",
                self.game.event_probability
            ));
        }
        if !(0.0..=1.0).contains(&self.game.focus_event_probability) {
            return Err(anyhow!(
                "game.focus_event_probability must be within 0.0..=1.0, got {}",
                self.game.focus_event_probability
            ));
        }
        if self.game.min_tab_secs < 0 {
            return Err(anyhow!(
                "game.min_tab_secs must not be negative, got {}",
                self.game.min_tab_secs
            ));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        Ok(())
    }

    /// Engine tunables derived from the `[game]` section.
    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            event_probability: self.game.event_probability,
            focus_event_probability: self.game.focus_event_probability,
            min_tab_secs: self.game.min_tab_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig {
                data_dir: "data/tabquest".to_string(),
            },
            game: GameConfig {
                event_probability: 0.3,
                focus_event_probability: 0.05,
                min_tab_secs: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: None,
            },
        }
    }
}
