//! Proximity zones

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete proximity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    /// Obstacle closer than the danger threshold
    Danger,
    /// Obstacle inside the warning band
    Warning,
    /// Nothing within range
    Safe,
    /// No usable reading
    Disconnected,
}

impl Zone {
    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Danger => "DANGER",
            Zone::Warning => "WARNING",
            Zone::Safe => "SAFE",
            Zone::Disconnected => "DISCONNECTED",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
