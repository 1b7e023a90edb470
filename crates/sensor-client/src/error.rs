//! Sensor Connectivity Errors

use thiserror::Error;

/// Errors that can occur while polling the sensor.
///
/// The variants only exist for diagnostics. Every one of them means the same
/// thing to the alerting pipeline: there is no usable reading this tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectivityError {
    /// HTTP client could not be built or the endpoint is unusable
    #[error("Sensor client setup failed: {0}")]
    Setup(String),

    /// Connection refused, DNS failure, reset, ...
    #[error("Sensor request failed: {0}")]
    Request(String),

    /// No response within the request timeout
    #[error("Timeout waiting for sensor response after {0}ms")]
    Timeout(u64),

    /// Non-2xx status code
    #[error("Sensor responded with HTTP status {0}")]
    Status(u16),

    /// Body is not the expected JSON object
    #[error("Malformed sensor payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ConnectivityError {
    fn from(err: serde_json::Error) -> Self {
        ConnectivityError::Malformed(err.to_string())
    }
}
