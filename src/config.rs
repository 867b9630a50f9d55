use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::{LogFormat, LogLevel};
use crate::models::{default_wake_time, ClockFormat};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Default estimation inputs when CLI flags are omitted
    pub defaults: InputDefaults,

    /// Display preferences
    pub display: DisplaySettings,

    /// Model artifact settings
    pub model: ModelSettings,

    /// Logging preferences
    pub logging: LoggingSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Seed values for the estimation inputs
///
/// These are preferences, not persisted interactions: the values a new
/// estimation starts from when the user does not say otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDefaults {
    /// Default wake-up time
    pub wake_time: NaiveTime,

    /// Default desired sleep in hours
    pub sleep_hours: f64,

    /// Default daily coffee intake in cups
    pub coffee_cups: u8,
}

/// Display preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Clock style for formatted times
    pub clock_format: ClockFormat,
}

/// Model artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Path to an alternative artifact; None uses the bundled model
    pub artifact_path: Option<PathBuf>,
}

/// Logging preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,

    /// Output format (pretty, json, compact)
    pub format: LogFormat,

    /// Log file path (None for stdout only)
    pub file_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            defaults: InputDefaults::default(),
            display: DisplaySettings::default(),
            model: ModelSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for InputDefaults {
    fn default() -> Self {
        InputDefaults {
            wake_time: default_wake_time(),
            sleep_hours: 8.0,
            coffee_cups: 1,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            clock_format: ClockFormat::default(),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        ModelSettings {
            artifact_path: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: LogLevel::Warn,
            format: LogFormat::Pretty,
            file_path: None,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        // Update modification timestamp
        self.metadata.updated_at = Utc::now();

        // Create directory if it doesn't exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".restrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }

    /// Get a configuration value by dotted key
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "defaults.wake_time" => Some(self.defaults.wake_time.format("%H:%M").to_string()),
            "defaults.sleep_hours" => Some(self.defaults.sleep_hours.to_string()),
            "defaults.coffee_cups" => Some(self.defaults.coffee_cups.to_string()),
            "display.clock_format" => Some(self.display.clock_format.to_string()),
            "model.artifact_path" => Some(
                self.model
                    .artifact_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(bundled)".to_string()),
            ),
            "logging.level" => Some(self.logging.level.to_filter()),
            _ => None,
        }
    }

    /// Set a configuration value by dotted key
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.wake_time" => {
                self.defaults.wake_time = NaiveTime::parse_from_str(value, "%H:%M")
                    .with_context(|| format!("Invalid wake time: {}", value))?;
            }
            "defaults.sleep_hours" => {
                self.defaults.sleep_hours = value
                    .parse::<f64>()
                    .with_context(|| format!("Invalid sleep hours: {}", value))?;
            }
            "defaults.coffee_cups" => {
                self.defaults.coffee_cups = value
                    .parse::<u8>()
                    .with_context(|| format!("Invalid coffee cups: {}", value))?;
            }
            "display.clock_format" => {
                self.display.clock_format = value
                    .parse::<ClockFormat>()
                    .map_err(|e| anyhow::anyhow!(e))?;
            }
            "model.artifact_path" => {
                self.model.artifact_path = Some(PathBuf::from(value));
            }
            "logging.level" => {
                self.logging.level = value.parse::<LogLevel>().map_err(|e| anyhow::anyhow!(e))?;
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }

    /// All known configuration keys with their current values
    pub fn list_values(&self) -> Vec<(String, String)> {
        [
            "defaults.wake_time",
            "defaults.sleep_hours",
            "defaults.coffee_cups",
            "display.clock_format",
            "model.artifact_path",
            "logging.level",
        ]
        .iter()
        .filter_map(|key| self.get_value(key).map(|v| (key.to_string(), v)))
        .collect()
    }
}
