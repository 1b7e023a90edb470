//! Proximity Zones
//!
//! Classifies sensor outcomes into discrete proximity zones and detects
//! changes between consecutive zones.

mod classifier;
mod detector;
mod error;
mod thresholds;
mod zone;

pub use classifier::ZoneClassifier;
pub use detector::{TransitionDetector, TransitionEvent};
pub use error::ConfigurationError;
pub use thresholds::Thresholds;
pub use zone::Zone;
