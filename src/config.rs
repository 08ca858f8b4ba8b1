//! Configuration management for Timeblock
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files. The tariff table and holiday calendar are
//! not configurable; only the host-facing glue is.

use crate::error::{Result, TimeBlockError};
#[cfg(feature = "openapi")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "TIMEBLOCK_CONFIG";

/// Timezone value meaning "use the system local clock"
pub const LOCAL_TIMEZONE: &str = "local";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(JsonSchema))]
#[serde(default)]
pub struct Config {
    /// Sensor identity as published to the host
    pub sensor: SensorConfig,

    /// Refresh interval in milliseconds
    pub poll_interval_ms: u64,

    /// Wall clock used for classification: "local" or an IANA zone name
    pub timezone: String,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Web server binding configuration
    pub web: WebConfig,
}

/// Published sensor identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(JsonSchema))]
#[serde(default)]
pub struct SensorConfig {
    /// Display name
    pub name: String,

    /// Attribution text shown alongside the value
    pub attribution: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(JsonSchema))]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional console-specific level overriding `level`
    pub console_level: Option<String>,

    /// Optional file-specific level overriding `level`
    pub file_level: Option<String>,

    /// Path to log file (its directory receives the rotated files)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(JsonSchema))]
#[serde(default)]
pub struct WebConfig {
    /// Whether to serve the HTTP API
    pub enabled: bool,

    /// Bind address
    pub host: String,

    /// TCP port
    pub port: u16,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `TIMEBLOCK_CONFIG` or the default locations
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }

        let default_paths = [
            "timeblock_config.yaml",
            "/data/timeblock_config.yaml",
            "/etc/timeblock/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Self::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parsed timezone; `None` means the system local clock
    pub fn timezone(&self) -> Result<Option<chrono_tz::Tz>> {
        if self.timezone.eq_ignore_ascii_case(LOCAL_TIMEZONE) {
            return Ok(None);
        }
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map(Some)
            .map_err(|e| TimeBlockError::validation("timezone", e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sensor.name.trim().is_empty() {
            return Err(TimeBlockError::validation(
                "sensor.name",
                "Name cannot be empty",
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(TimeBlockError::validation(
                "poll_interval_ms",
                "Must be greater than 0",
            ));
        }

        self.timezone()?;

        if self.web.enabled && self.web.port == 0 {
            return Err(TimeBlockError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval_ms, 60_000);
        assert_eq!(config.timezone, LOCAL_TIMEZONE);
        assert_eq!(config.web.port, 8089);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.timezone = "Mars/Olympus".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.timezone = "Europe/Ljubljana".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.timezone().unwrap(), Some(chrono_tz::Europe::Ljubljana));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("poll_interval_ms: 5000\n").unwrap();
        assert_eq!(config.poll_interval_ms, 5000);
        assert_eq!(config.sensor.name, "URO SI TimeBlock");
        assert!(config.web.enabled);
    }
}
