//! Alerting System
//!
//! Turns zone transitions into actuator commands (tone, vibration, banner,
//! warning beep, disconnected indicator), retracting the previous zone's
//! effects before the next zone's effects start.

mod actuator;
mod dispatcher;

pub use actuator::{
    apply_directive, ActuatorCommand, ActuatorError, Actuators, RecordingActuators,
};
pub use dispatcher::{
    ActuatorDirective, AlertDispatcher, AlertPreferences, AlertState, Effect,
    DEFAULT_VIBRATION_PATTERN_MS,
};
