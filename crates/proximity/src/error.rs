//! Configuration Error Types

use thiserror::Error;

/// Invalid pipeline configuration, detected before polling starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Threshold below zero
    #[error("{field} must be non-negative, got {value}")]
    NegativeThreshold { field: &'static str, value: i64 },

    /// Danger band does not sit strictly below the warning band
    #[error("danger_max ({danger_max}) must be less than warning_max ({warning_max})")]
    InvertedThresholds { danger_max: i64, warning_max: i64 },

    /// Threshold does not fit the distance type
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
}
