//! Proximity Monitor
//!
//! Polls the distance sensor on a fixed cadence and drives the
//! classify → detect → dispatch pipeline until shut down.

mod error;
mod poll_loop;
mod settings;
mod shutdown;
mod status;

pub use error::MonitorError;
pub use poll_loop::{PollLoop, TickOutcome};
pub use settings::{MonitorConfig, ENV_PREFIX};
pub use shutdown::{shutdown_channel, ShutdownHandle, ShutdownSignal};
pub use status::MonitorStatus;

pub use alerting::{Actuators, AlertPreferences, RecordingActuators};
pub use proximity::Zone;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber
pub fn init_logging() -> Result<(), MonitorError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| MonitorError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_installs_once() {
        let _ = init_logging();
        assert!(matches!(init_logging(), Err(MonitorError::Logging(_))));
    }
}
