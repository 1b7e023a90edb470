//! HTTP Client for the Distance Sensor
//!
//! Issues a single GET per poll and decodes `{"distance": <int>}`.

use crate::error::ConnectivityError;
use crate::reading::Reading;
use crate::DistanceSource;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Endpoint served by the sensor's access point
pub const DEFAULT_ENDPOINT: &str = "http://192.168.1.1/sensor";

/// Wire payload; extra fields are ignored
#[derive(Debug, Deserialize)]
struct SensorPayload {
    distance: i64,
}

/// HTTP client for the distance sensor
pub struct SensorClient {
    /// Sensor endpoint (e.g., "http://192.168.1.1/sensor")
    endpoint: Url,
    /// Per-request timeout
    timeout: Duration,
    http: reqwest::Client,
}

impl SensorClient {
    /// Create a new sensor client
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the sensor's JSON resource
    /// * `timeout` - Upper bound on one request, connect included
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ConnectivityError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ConnectivityError::Setup(format!("invalid endpoint {endpoint:?}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ConnectivityError::Setup(e.to_string()))?;

        info!("Creating sensor client for {} (timeout {:?})", endpoint, timeout);

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch and decode one reading
    pub async fn fetch(&self) -> Result<Reading, ConnectivityError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectivityError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let reading = decode_payload(&body)?;
        if !reading.is_valid() {
            debug!("Sensor reported invalid distance {}", reading.raw());
        }
        Ok(reading)
    }

    /// Request timeout in milliseconds, saturating
    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ConnectivityError {
        if err.is_timeout() {
            ConnectivityError::Timeout(self.timeout_ms())
        } else {
            ConnectivityError::Request(err.to_string())
        }
    }
}

impl DistanceSource for SensorClient {
    async fn poll(&mut self) -> Result<Reading, ConnectivityError> {
        self.fetch().await
    }
}

/// Decode a response body into a reading
fn decode_payload(body: &str) -> Result<Reading, ConnectivityError> {
    let payload: SensorPayload = serde_json::from_str(body)?;
    Ok(Reading::from_raw(payload.distance))
}
