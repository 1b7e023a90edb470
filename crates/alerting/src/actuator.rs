//! Actuator interface
//!
//! The audio, vibration and display outputs live outside this crate. They
//! are driven through [`Actuators`] in the order a directive lists them.

use crate::dispatcher::{ActuatorDirective, AlertState, Effect};
use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;

/// Errors reported by an actuator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActuatorError {
    /// Output device is not available (no audio focus, no vibrator, ...)
    #[error("{0} actuator unavailable")]
    Unavailable(Effect),

    /// Device accepted the command but failed to carry it out
    #[error("{effect} actuator failed: {reason}")]
    Failed { effect: Effect, reason: String },
}

/// Output side of the alert pipeline
pub trait Actuators {
    /// Start or stop (and rewind) the continuous danger tone
    fn set_danger_tone(&mut self, active: bool) -> Result<(), ActuatorError>;

    /// Start the repeating vibration pattern, or cancel vibration
    fn set_vibration(&mut self, active: bool, pattern_ms: &[u64]) -> Result<(), ActuatorError>;

    /// Play the short warning tone once, or cancel it
    fn set_warning_beep(&mut self, active: bool) -> Result<(), ActuatorError>;

    /// Show or hide the persistent danger banner
    fn set_banner_visible(&mut self, visible: bool) -> Result<(), ActuatorError>;

    /// Show or hide the "no data" indicator
    fn set_disconnected_indicator(&mut self, active: bool) -> Result<(), ActuatorError>;
}

/// Issue a directive's commands, retractions first.
///
/// A failing command is logged and skipped; the remaining commands are still
/// issued. Returns the number of failed commands.
pub fn apply_directive<A>(directive: &ActuatorDirective, actuators: &mut A) -> usize
where
    A: Actuators + ?Sized,
{
    let mut failures = 0;
    for (effect, active) in directive.commands() {
        let result = match effect {
            Effect::DangerTone => actuators.set_danger_tone(active),
            Effect::Vibration => actuators.set_vibration(active, &directive.vibration_pattern_ms),
            Effect::WarningBeep => actuators.set_warning_beep(active),
            Effect::Banner => actuators.set_banner_visible(active),
            Effect::DisconnectedIndicator => actuators.set_disconnected_indicator(active),
        };

        if let Err(e) = result {
            failures += 1;
            let action = if active { "apply" } else { "retract" };
            warn!("Failed to {} {} entering {}: {}", action, effect, directive.zone, e);
        }
    }
    failures
}

/// A single command received by [`RecordingActuators`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub effect: Effect,
    pub active: bool,
}

/// Actuators that only record what they were told to do.
///
/// Useful for hosts without output hardware and for tests. Effects can be
/// made to fail with [`fail_on`](Self::fail_on).
#[derive(Debug, Default)]
pub struct RecordingActuators {
    commands: Vec<ActuatorCommand>,
    state: AlertState,
    failing: HashSet<Effect>,
}

impl RecordingActuators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every command for `effect` fail without changing state
    pub fn fail_on(&mut self, effect: Effect) {
        self.failing.insert(effect);
    }

    /// Every command received, in order
    pub fn commands(&self) -> &[ActuatorCommand] {
        &self.commands
    }

    /// Outputs as they currently are
    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    fn record(&mut self, effect: Effect, active: bool) -> Result<(), ActuatorError> {
        self.commands.push(ActuatorCommand { effect, active });
        if self.failing.contains(&effect) {
            return Err(ActuatorError::Failed {
                effect,
                reason: "simulated failure".to_string(),
            });
        }
        match effect {
            Effect::WarningBeep => self.state.warning_beep = active,
            Effect::DangerTone => self.state.danger_tone = active,
            Effect::Vibration => self.state.vibration = active,
            Effect::Banner => self.state.banner = active,
            Effect::DisconnectedIndicator => self.state.disconnected_indicator = active,
        }
        Ok(())
    }
}

impl Actuators for RecordingActuators {
    fn set_danger_tone(&mut self, active: bool) -> Result<(), ActuatorError> {
        self.record(Effect::DangerTone, active)
    }

    fn set_vibration(&mut self, active: bool, _pattern_ms: &[u64]) -> Result<(), ActuatorError> {
        self.record(Effect::Vibration, active)
    }

    fn set_warning_beep(&mut self, active: bool) -> Result<(), ActuatorError> {
        self.record(Effect::WarningBeep, active)
    }

    fn set_banner_visible(&mut self, visible: bool) -> Result<(), ActuatorError> {
        self.record(Effect::Banner, visible)
    }

    fn set_disconnected_indicator(&mut self, active: bool) -> Result<(), ActuatorError> {
        self.record(Effect::DisconnectedIndicator, active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::AlertDispatcher;
    use chrono::Utc;
    use proximity::{TransitionEvent, Zone};

    fn event(from: Option<Zone>, to: Zone) -> TransitionEvent {
        TransitionEvent {
            from,
            to,
            timestamp: Utc::now(),
            distance_cm: None,
        }
    }

    #[test]
    fn test_retractions_issued_before_applications() {
        let mut dispatcher = AlertDispatcher::default();
        let mut actuators = RecordingActuators::new();

        apply_directive(&dispatcher.dispatch(&event(None, Zone::Warning)), &mut actuators);
        actuators.clear();
        apply_directive(
            &dispatcher.dispatch(&event(Some(Zone::Warning), Zone::Danger)),
            &mut actuators,
        );

        assert_eq!(
            actuators.commands()[0],
            ActuatorCommand {
                effect: Effect::WarningBeep,
                active: false
            }
        );
        assert!(actuators.commands()[1..].iter().all(|c| c.active));
        assert_eq!(actuators.state(), dispatcher.state());
    }

    #[test]
    fn test_failed_retraction_does_not_block_new_effect() {
        let mut dispatcher = AlertDispatcher::default();
        let mut actuators = RecordingActuators::new();

        apply_directive(&dispatcher.dispatch(&event(None, Zone::Danger)), &mut actuators);
        actuators.fail_on(Effect::DangerTone);

        let failures = apply_directive(
            &dispatcher.dispatch(&event(Some(Zone::Danger), Zone::Disconnected)),
            &mut actuators,
        );

        assert_eq!(failures, 1);
        let state = actuators.state();
        assert!(!state.vibration);
        assert!(!state.banner);
        assert!(state.disconnected_indicator);
    }

    #[test]
    fn test_empty_directive_issues_nothing() {
        let mut dispatcher = AlertDispatcher::default();
        let mut actuators = RecordingActuators::new();

        let directive = dispatcher.dispatch(&event(Some(Zone::Safe), Zone::Safe));
        assert_eq!(apply_directive(&directive, &mut actuators), 0);
        assert!(actuators.commands().is_empty());
    }
}
