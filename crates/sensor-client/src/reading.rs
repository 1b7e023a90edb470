//! Distance readings

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One sensor sample.
///
/// The sensor signals a failed measurement with a negative distance, so the
/// raw wire value is kept alongside the validated centimeter distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reading {
    raw: i64,
    distance_cm: Option<u32>,
    received_at: DateTime<Utc>,
}

impl Reading {
    /// Build a reading from the raw wire value, stamped now
    pub fn from_raw(raw: i64) -> Self {
        Self::from_raw_at(raw, Utc::now())
    }

    /// Build a reading from the raw wire value with an explicit timestamp
    pub fn from_raw_at(raw: i64, received_at: DateTime<Utc>) -> Self {
        Self {
            raw,
            distance_cm: u32::try_from(raw).ok(),
            received_at,
        }
    }

    /// Shorthand for a valid reading in centimeters
    pub fn centimeters(distance_cm: u32) -> Self {
        Self::from_raw(i64::from(distance_cm))
    }

    /// Distance in centimeters, `None` if the sensor reported an invalid value
    pub fn distance_cm(&self) -> Option<u32> {
        self.distance_cm
    }

    /// Value exactly as received
    pub fn raw(&self) -> i64 {
        self.raw
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn is_valid(&self) -> bool {
        self.distance_cm.is_some()
    }
}
