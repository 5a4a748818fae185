//! Application configuration

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_with::serde_as;

use crate::errors::AisWatchError;
use crate::models::IgnoredVessel;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub barentswatch: BarentsWatchConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; without one, sighting state lives in memory only
    pub url: Option<String>,
    pub max_connections: u32,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct BarentsWatchConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Static bearer token, used when no client credentials are configured
    pub access_token: Option<String>,
    pub token_url: String,
    pub find_in_area_url: String,
    pub latest_combined_url: String,
    /// MMSIs per `latest/combined` request
    pub batch_size: usize,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub timeout: Duration,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SlackConfig {
    pub webhook_url: Option<String>,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    /// GeoJSON file with the monitored area
    pub geojson_path: PathBuf,
    pub max_area_km2: f64,
    /// Hours without a sighting before a vessel may arrive again
    pub retention_hours: i64,
    /// Hours of history to search for vessels in the area
    pub lookback_hours: i64,
    /// Background poll interval, zero disables the scheduler
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub poll_interval: Duration,
    /// Append flag emoji to the flag state in notifications
    pub flag_emoji: bool,
    #[serde(default)]
    pub ignore: Vec<IgnoredVessel>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.bind", "0.0.0.0:5000")?
            .set_default("database.max_connections", 5)?
            .set_default("barentswatch.token_url", "https://id.barentswatch.no/connect/token")?
            .set_default(
                "barentswatch.find_in_area_url",
                "https://historic.ais.barentswatch.no/v1/historic/mmsiinarea",
            )?
            .set_default(
                "barentswatch.latest_combined_url",
                "https://live.ais.barentswatch.no/v1/latest/combined",
            )?
            .set_default("barentswatch.batch_size", 300)?
            .set_default("barentswatch.timeout", 60)?
            .set_default("monitor.geojson_path", "map.geojson")?
            .set_default("monitor.max_area_km2", 500.0)?
            .set_default("monitor.retention_hours", 24)?
            .set_default("monitor.lookback_hours", 1)?
            .set_default("monitor.poll_interval", 600)?
            .set_default("monitor.flag_emoji", true)?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_default("database.url", url)?;
        }

        let config = builder
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("AISWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), AisWatchError> {
        self.barentswatch.validate()?;
        self.monitor.validate()
    }
}

impl BarentsWatchConfig {
    pub fn validate(&self) -> Result<(), AisWatchError> {
        if self.batch_size == 0 {
            return Err(AisWatchError::ConfigurationError {
                message: "Batch size must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl MonitorConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), AisWatchError> {
        if !(self.max_area_km2 > 0.0) {
            return Err(AisWatchError::ConfigurationError {
                message: "Maximum area must be greater than zero".to_string(),
            });
        }
        window_hours("Retention", self.retention_hours)?;
        window_hours("Lookback", self.lookback_hours)?;
        Ok(())
    }

    /// Retention window, saturating for values `validate` rejects
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.retention_hours).unwrap_or(chrono::Duration::MAX)
    }

    /// Lookback window, saturating for values `validate` rejects
    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.lookback_hours).unwrap_or(chrono::Duration::MAX)
    }
}

/// A window must be positive and reach back to a representable time
fn window_hours(name: &str, hours: i64) -> Result<chrono::Duration, AisWatchError> {
    if hours <= 0 {
        return Err(AisWatchError::ConfigurationError {
            message: format!("{name} window must be greater than zero"),
        });
    }
    chrono::Duration::try_hours(hours)
        .filter(|window| chrono::Utc::now().checked_sub_signed(*window).is_some())
        .ok_or_else(|| AisWatchError::ConfigurationError {
            message: format!("{name} window of {hours} hours is too long"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn monitor() -> MonitorConfig {
        MonitorConfig {
            geojson_path: PathBuf::from("map.geojson"),
            max_area_km2: 500.0,
            retention_hours: 24,
            lookback_hours: 1,
            poll_interval: Duration::from_secs(600),
            flag_emoji: true,
            ignore: Vec::new(),
        }
    }

    #[test]
    fn test_load_config() {
        env::set_var("AISWATCH__SERVER__BIND", "127.0.0.1:8080");
        env::set_var("AISWATCH__BARENTSWATCH__ACCESS_TOKEN", "static-token");
        env::set_var("AISWATCH__MONITOR__MAX_AREA_KM2", "250");
        env::set_var("AISWATCH__MONITOR__POLL_INTERVAL", "0");

        let config = AppConfig::load().unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(
            config.barentswatch.access_token.as_deref(),
            Some("static-token")
        );
        assert_eq!(config.monitor.max_area_km2, 250.0);
        assert_eq!(config.monitor.poll_interval, Duration::ZERO);

        // Untouched values keep their defaults
        assert_eq!(config.barentswatch.batch_size, 300);
        assert_eq!(config.barentswatch.timeout, Duration::from_secs(60));
        assert_eq!(config.monitor.retention_hours, 24);
        assert_eq!(config.monitor.lookback_hours, 1);
        assert!(config.monitor.flag_emoji);
        assert!(config.monitor.ignore.is_empty());
        assert!(config.slack.webhook_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_monitor_config_validate() {
        assert!(monitor().validate().is_ok());
        assert_eq!(monitor().retention(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_monitor_config_validate_invalid_area() {
        let config = MonitorConfig {
            max_area_km2: 0.0,
            ..monitor()
        };
        assert!(config.validate().is_err());

        let config = MonitorConfig {
            max_area_km2: f64::NAN,
            ..monitor()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_monitor_config_validate_huge_windows() {
        let config = MonitorConfig {
            retention_hours: i64::MAX / 1000,
            ..monitor()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.retention(), chrono::Duration::MAX);

        let config = MonitorConfig {
            lookback_hours: 10_000_000_000,
            ..monitor()
        };
        assert!(config.validate().is_err());

        let config = MonitorConfig {
            retention_hours: 24 * 365,
            ..monitor()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_monitor_config_validate_invalid_windows() {
        let config = MonitorConfig {
            retention_hours: 0,
            ..monitor()
        };
        assert!(config.validate().is_err());

        let config = MonitorConfig {
            lookback_hours: -1,
            ..monitor()
        };
        assert!(config.validate().is_err());
    }
}
