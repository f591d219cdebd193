//! Configuration loading from TOML files.
//!
//! A config file is optional for library use; every field has a default so
//! tests and local runs can start from `Config::default()`.

use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database file.
    pub database: String,
    pub pipeline: PipelineConfig,
    pub drivly: EndpointConfig,
    pub vincario: EndpointConfig,
    pub geocoder: EndpointConfig,
    pub directory: EndpointConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum days between vendor pulls for the same VIN.
    pub repull_window_days: i64,
    /// Days a user-triggered offer request stays throttled.
    pub offer_throttle_days: i64,
    /// Seconds a queue fetch blocks waiting for a message.
    pub fetch_wait_secs: u64,
    /// Seconds device-directory lookups stay cached.
    pub device_cache_ttl_secs: u64,
    /// Client-side timeout for vendor HTTP calls, in seconds. Offer
    /// endpoints are slow, so this is deliberately generous.
    pub vendor_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            repull_window_days: 14,
            offer_throttle_days: 30,
            fetch_wait_secs: 5,
            device_cache_ttl_secs: 300,
            vendor_timeout_secs: 180,
        }
    }
}

/// Base URL and API key for one external HTTP collaborator.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" });
        }
        if self.pipeline.repull_window_days <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.repull_window_days",
                reason: "must be positive".into(),
            });
        }
        if self.pipeline.offer_throttle_days <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.offer_throttle_days",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config {
            database: "valuations.db".into(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.pipeline.repull_window_days, 14);
        assert_eq!(config.pipeline.offer_throttle_days, 30);
    }

    #[test]
    fn rejects_empty_database() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field: "database" })
        ));
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            database = "/tmp/test.db"

            [pipeline]
            repull_window_days = 7

            [drivly]
            base_url = "https://drivly.example"
            api_key = "key"
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.database, "/tmp/test.db");
        assert_eq!(config.pipeline.repull_window_days, 7);
        // Untouched sections keep their defaults.
        assert_eq!(config.pipeline.offer_throttle_days, 30);
        assert_eq!(config.logging.level, "info");
    }
}
