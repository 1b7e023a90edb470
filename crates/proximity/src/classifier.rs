//! Zone classification

use crate::thresholds::Thresholds;
use crate::zone::Zone;
use sensor_client::{ConnectivityError, Reading};

/// Maps sensor outcomes to zones. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneClassifier {
    thresholds: Thresholds,
}

impl ZoneClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Classify the outcome of one poll
    pub fn classify(&self, outcome: &Result<Reading, ConnectivityError>) -> Zone {
        match outcome {
            Ok(reading) => self.classify_distance(reading.distance_cm()),
            Err(_) => Zone::Disconnected,
        }
    }

    /// Classify a bare distance; `None` means no valid reading
    pub fn classify_distance(&self, distance_cm: Option<u32>) -> Zone {
        match distance_cm {
            None => Zone::Disconnected,
            Some(d) if d < self.thresholds.danger_max() => Zone::Danger,
            // Warning band is closed on both ends
            Some(d) if d <= self.thresholds.warning_max() => Zone::Warning,
            Some(_) => Zone::Safe,
        }
    }
}
