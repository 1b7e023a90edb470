//! Monitor configuration
//!
//! Layered from an optional file, then `PROXIMITY_*` environment variables
//! (nested keys use `__`, e.g. `PROXIMITY_ALERTS__SOUND_ENABLED=false`).
//! Missing keys fall back to the defaults below.

use crate::error::MonitorError;
use alerting::AlertPreferences;
use config::{Config, Environment, File};
use proximity::Thresholds;
use sensor_client::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "PROXIMITY";

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Sensor JSON endpoint
    pub endpoint: String,
    /// Time between polls (milliseconds)
    pub poll_interval_ms: u64,
    /// Upper bound on one sensor request (milliseconds)
    pub request_timeout_ms: u64,
    /// Distances below this are danger (cm)
    pub danger_max: i64,
    /// Distances up to and including this are warning (cm)
    pub warning_max: i64,
    /// Sound / vibration preferences
    pub alerts: AlertPreferences,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval_ms: 1000,
            request_timeout_ms: 800,
            danger_max: 20,
            warning_max: 29,
            alerts: AlertPreferences::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from an optional file plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self, MonitorError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, MonitorError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            info!("Loading monitor configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("alerts.vibration_pattern_ms"),
            )
            .build()?;

        let config: MonitorConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check every constraint the poll loop relies on
    pub fn validate(&self) -> Result<(), MonitorError> {
        self.thresholds()?;

        if self.poll_interval_ms == 0 {
            return Err(MonitorError::ZeroInterval);
        }
        if self.request_timeout_ms == 0 {
            return Err(MonitorError::ZeroTimeout);
        }
        if self.request_timeout_ms >= self.poll_interval_ms {
            return Err(MonitorError::TimeoutExceedsInterval {
                timeout_ms: self.request_timeout_ms,
                interval_ms: self.poll_interval_ms,
            });
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Result<Thresholds, MonitorError> {
        Ok(Thresholds::new(self.danger_max, self.warning_max)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proximity::ConfigurationError;

    #[test]
    fn test_defaults_are_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds().unwrap(), Thresholds::default());
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_inverted_thresholds() {
        let config = MonitorConfig {
            danger_max: 30,
            warning_max: 20,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MonitorError::Thresholds(ConfigurationError::InvertedThresholds { .. }))
        ));
    }

    #[test]
    fn test_timeout_must_be_shorter_than_interval() {
        let config = MonitorConfig {
            poll_interval_ms: 500,
            request_timeout_ms: 500,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MonitorError::TimeoutExceedsInterval {
                timeout_ms: 500,
                interval_ms: 500
            })
        ));
    }

    #[test]
    fn test_zero_interval() {
        let config = MonitorConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MonitorError::ZeroInterval)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "proximity-monitor-{}-load.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"
endpoint = "http://10.0.0.7/sensor"
poll_interval_ms = 500
request_timeout_ms = 250
danger_max = 15

[alerts]
sound_enabled = false
"#,
        )
        .unwrap();

        let config = MonitorConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.endpoint, "http://10.0.0.7/sensor");
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.danger_max, 15);
        assert_eq!(config.warning_max, 29);
        assert!(!config.alerts.sound_enabled);
        assert!(config.alerts.vibration_enabled);
    }

    #[test]
    fn test_env_overrides() {
        // Own prefix so parallel tests never see these variables
        let prefix = "PROXIMITYENVTEST";
        let vars = [
            ("PROXIMITYENVTEST_POLL_INTERVAL_MS", "2000"),
            ("PROXIMITYENVTEST_ALERTS__SOUND_ENABLED", "false"),
            ("PROXIMITYENVTEST_ALERTS__VIBRATION_PATTERN_MS", "0,100,50"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let result = MonitorConfig::load_with_prefix(None, prefix);
        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let config = result.unwrap();
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.request_timeout_ms, 800);
        assert!(!config.alerts.sound_enabled);
        assert!(config.alerts.vibration_enabled);
        assert_eq!(config.alerts.vibration_pattern_ms, vec![0, 100, 50]);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "proximity-monitor-{}-invalid.toml",
            std::process::id()
        ));
        std::fs::write(&path, "danger_max = 40\nwarning_max = 10\n").unwrap();

        let result = MonitorConfig::load(Some(&path));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(MonitorError::Thresholds(_))));
    }
}
