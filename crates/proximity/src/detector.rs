//! Zone transition detection
//!
//! Emits an event only when the classified zone differs from the last one
//! emitted, so downstream effects fire once per run of identical zones rather
//! than once per sample.

use crate::zone::Zone;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// A change from one zone to a different one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionEvent {
    /// Previous zone; `None` for the first classification
    pub from: Option<Zone>,
    /// Newly entered zone
    pub to: Zone,
    /// When the triggering reading was classified
    pub timestamp: DateTime<Utc>,
    /// Distance that caused the transition, if there was a valid one
    pub distance_cm: Option<u32>,
}

impl TransitionEvent {
    /// Whether `from` and `to` are the same zone
    pub fn is_repeat(&self) -> bool {
        self.from == Some(self.to)
    }
}

/// Edge detector over the zone stream
#[derive(Debug, Clone, Default)]
pub struct TransitionDetector {
    last_emitted: Option<Zone>,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a zone, stamped now
    pub fn observe(&mut self, zone: Zone) -> Option<TransitionEvent> {
        self.observe_at(zone, None, Utc::now())
    }

    /// Observe a zone along with the distance that produced it
    pub fn observe_at(
        &mut self,
        zone: Zone,
        distance_cm: Option<u32>,
        timestamp: DateTime<Utc>,
    ) -> Option<TransitionEvent> {
        if self.last_emitted == Some(zone) {
            return None;
        }

        let event = TransitionEvent {
            from: self.last_emitted,
            to: zone,
            timestamp,
            distance_cm,
        };
        debug!("Zone transition {:?} -> {}", event.from, event.to);
        self.last_emitted = Some(zone);
        Some(event)
    }

    /// Last emitted zone, `None` before the first observation
    pub fn current(&self) -> Option<Zone> {
        self.last_emitted
    }

    /// Forget the last zone so the next observation emits again
    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}
