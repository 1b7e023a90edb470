//! Monitor Error Types

use proximity::ConfigurationError;
use sensor_client::ConnectivityError;
use thiserror::Error;

/// Errors that prevent the monitor from starting
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Zone thresholds are invalid
    #[error("Invalid thresholds: {0}")]
    Thresholds(#[from] ConfigurationError),

    /// Configuration sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Poll interval of zero
    #[error("poll_interval_ms must be greater than zero")]
    ZeroInterval,

    /// Request timeout of zero
    #[error("request_timeout_ms must be greater than zero")]
    ZeroTimeout,

    /// A request could outlive its tick
    #[error("request_timeout_ms ({timeout_ms}) must be shorter than poll_interval_ms ({interval_ms})")]
    TimeoutExceedsInterval { timeout_ms: u64, interval_ms: u64 },

    /// Sensor client could not be created
    #[error("Sensor client setup failed: {0}")]
    Sensor(#[from] ConnectivityError),

    /// Global tracing subscriber already set
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
