use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::load::LoadThresholds;
use crate::reminders::ReminderConfig;
use crate::sleep::DEFAULT_SLEEP_GOAL;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Sleep tracking settings
    pub sleep: SleepSettings,

    /// Weekly load thresholds
    pub load: LoadThresholds,

    /// Reminder heuristic tuning
    pub reminders: ReminderConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Data directory the JSON store writes under
    pub data_dir: PathBuf,

    /// Body weight in kilograms, used for energy estimation.
    ///
    /// Absent weight makes calorie estimates read as "unknown" rather than
    /// zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_weight_kg: Option<Decimal>,
}

/// Sleep tracking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSettings {
    /// Nightly duration goal in minutes
    pub goal_minutes: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        AppConfig {
            metadata: ConfigMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings {
                data_dir: crate::storage::JsonStore::default_dir()
                    .unwrap_or_else(|| PathBuf::from(".")),
                body_weight_kg: None,
            },
            sleep: SleepSettings {
                goal_minutes: DEFAULT_SLEEP_GOAL,
            },
            load: LoadThresholds::default(),
            reminders: ReminderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Platform config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("carnet").join("config.toml"))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load a configuration file, or fall back to defaults if it is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(?path, "config file absent, using defaults");
            Ok(AppConfig::default())
        }
    }

    /// Persist the configuration, stamping the update time.
    pub fn save(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.metadata.updated_at = Utc::now();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
