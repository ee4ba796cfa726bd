//! Configuration management for hotprospects.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::notify::ReminderTrigger;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "hotprospects";

/// Default notification centre file name.
const NOTIFICATIONS_FILE_NAME: &str = "notifications.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `HOTPROSPECTS_`, `__` between sections)
/// 2. TOML config file at `~/.config/hotprospects/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Reminder configuration.
    pub reminders: ReminderConfig,
    /// Notification centre configuration.
    pub notifications: NotificationConfig,
}

/// Which backend holds the saved prospect list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// A JSON document file in the data directory.
    #[default]
    File,
    /// A key in the `SQLite` defaults database.
    KeyValue,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend to use.
    pub backend: StorageBackend,
    /// Directory holding all saved data.
    /// Defaults to `~/.local/share/hotprospects`
    pub data_dir: Option<PathBuf>,
    /// File name used by the file backend.
    pub file_name: String,
    /// File name of the defaults database used by the key-value backend.
    pub database_name: String,
    /// Key the key-value backend stores the list under.
    pub save_key: String,
}

/// Reminder-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Delay between scheduling and delivery, in seconds.
    pub delay_secs: u64,
    /// Deliver at the next occurrence of this hour (0-23) instead of after
    /// `delay_secs`.
    pub hour: Option<u32>,
    /// Play the default notification sound.
    pub sound: bool,
}

/// Notification centre configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Path to the local notification centre state.
    /// Defaults to `~/.local/share/hotprospects/notifications.json`
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: None,
            file_name: "prospects.json".to_string(),
            database_name: "defaults.db".to_string(),
            save_key: crate::storage::defaults::SAVE_KEY.to_string(),
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            delay_secs: 5,
            hour: None,
            sound: true,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer on TOML config file (if it exists); sections are plain tables
            .merge(Toml::file(&config_file))
            // Layer on environment variables, `__` separating section and key
            .merge(Env::prefixed("HOTPROSPECTS_").split("__"));

        let config: Config = figment.extract()?;

        // Validate the configuration
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.file_name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.file_name must not be empty".to_string(),
            });
        }

        if self.storage.database_name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.database_name must not be empty".to_string(),
            });
        }

        if self.storage.save_key.is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.save_key must not be empty".to_string(),
            });
        }

        // The delay only matters when no hour is set
        match self.reminders.hour {
            Some(hour) if hour > 23 => {
                return Err(Error::ConfigValidation {
                    message: format!("reminders.hour must be between 0 and 23, got {hour}"),
                });
            }
            None if self.reminders.delay_secs == 0 => {
                return Err(Error::ConfigValidation {
                    message: "reminders.delay_secs must be greater than 0".to_string(),
                });
            }
            _ => {}
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Path used by the file backend.
    #[must_use]
    pub fn prospects_file_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.file_name)
    }

    /// Path used by the key-value backend.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.database_name)
    }

    /// Path of the local notification centre state.
    #[must_use]
    pub fn notifications_path(&self) -> PathBuf {
        self.notifications
            .path
            .clone()
            .unwrap_or_else(|| self.data_dir().join(NOTIFICATIONS_FILE_NAME))
    }

    /// The trigger new reminders are scheduled with.
    #[must_use]
    pub fn reminder_trigger(&self) -> ReminderTrigger {
        match self.reminders.hour {
            Some(hour) => ReminderTrigger::Calendar {
                hour,
                repeats: false,
            },
            None => ReminderTrigger::TimeInterval {
                seconds: self.reminders.delay_secs,
                repeats: false,
            },
        }
    }
}
