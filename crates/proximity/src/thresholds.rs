//! Zone thresholds

use crate::error::ConfigurationError;
use serde::Serialize;

/// Default upper bound (exclusive) of the danger band, in cm
pub const DEFAULT_DANGER_MAX: u32 = 20;

/// Default upper bound (inclusive) of the warning band, in cm
pub const DEFAULT_WARNING_MAX: u32 = 29;

/// Distance thresholds separating the proximity zones.
///
/// `d < danger_max` is danger, `danger_max <= d <= warning_max` is warning,
/// anything further is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    danger_max: u32,
    warning_max: u32,
}

impl Thresholds {
    /// Validate and build thresholds
    pub fn new(danger_max: i64, warning_max: i64) -> Result<Self, ConfigurationError> {
        let danger = to_cm("danger_max", danger_max)?;
        let warning = to_cm("warning_max", warning_max)?;

        if danger >= warning {
            return Err(ConfigurationError::InvertedThresholds {
                danger_max,
                warning_max,
            });
        }

        Ok(Self {
            danger_max: danger,
            warning_max: warning,
        })
    }

    pub fn danger_max(&self) -> u32 {
        self.danger_max
    }

    pub fn warning_max(&self) -> u32 {
        self.warning_max
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            danger_max: DEFAULT_DANGER_MAX,
            warning_max: DEFAULT_WARNING_MAX,
        }
    }
}

fn to_cm(field: &'static str, value: i64) -> Result<u32, ConfigurationError> {
    if value < 0 {
        return Err(ConfigurationError::NegativeThreshold { field, value });
    }
    u32::try_from(value).map_err(|_| ConfigurationError::OutOfRange { field, value })
}
