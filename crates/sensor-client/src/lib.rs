//! Sensor Client
//!
//! Polls a networked ultrasonic sensor over HTTP and turns each response into
//! a typed [`Reading`] or a [`ConnectivityError`]. One request per call, no
//! retries; the caller's poll cadence is the retry policy.

mod client;
mod error;
mod reading;

use std::future::Future;

pub use client::{SensorClient, DEFAULT_ENDPOINT};
pub use error::ConnectivityError;
pub use reading::Reading;

/// Source of distance readings, polled once per tick.
///
/// Implementations must bound the time a single `poll` may take.
pub trait DistanceSource {
    /// Take one sample from the sensor
    fn poll(&mut self) -> impl Future<Output = Result<Reading, ConnectivityError>> + Send;
}
