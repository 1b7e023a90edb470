//! Observable monitor state

use chrono::{DateTime, Utc};
use proximity::Zone;
use serde::Serialize;

/// Snapshot published after every tick for presentation layers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStatus {
    /// Zone of the latest tick, `None` before the first tick
    pub zone: Option<Zone>,
    /// Distance from the latest tick, `None` if invalid or unreachable
    pub distance_cm: Option<u32>,
    /// Time of the latest zone transition
    pub last_transition: Option<DateTime<Utc>>,
    /// Failed polls since the last successful one
    pub consecutive_failures: u32,
    /// Ticks completed
    pub ticks: u64,
}

impl MonitorStatus {
    pub fn is_connected(&self) -> bool {
        !matches!(self.zone, None | Some(Zone::Disconnected))
    }
}
