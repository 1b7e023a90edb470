//! Alert Dispatcher Implementation

use proximity::{TransitionEvent, Zone};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Vibration waveform for the danger zone: off/on durations in milliseconds
pub const DEFAULT_VIBRATION_PATTERN_MS: [u64; 4] = [0, 300, 200, 300];

/// An output the dispatcher can switch on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Short one-shot tone for the warning band
    WarningBeep,
    /// Continuous tone while in danger
    DangerTone,
    /// Repeating vibration pattern while in danger
    Vibration,
    /// Persistent "too close" visual callout
    Banner,
    /// "No data" visual state
    DisconnectedIndicator,
}

impl Effect {
    /// Every effect, in the order retractions and applications are issued
    pub const ALL: [Effect; 5] = [
        Effect::WarningBeep,
        Effect::DangerTone,
        Effect::Vibration,
        Effect::Banner,
        Effect::DisconnectedIndicator,
    ];
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Effect::WarningBeep => "warning beep",
            Effect::DangerTone => "danger tone",
            Effect::Vibration => "vibration",
            Effect::Banner => "banner",
            Effect::DisconnectedIndicator => "disconnected indicator",
        };
        f.write_str(name)
    }
}

/// User alert preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertPreferences {
    /// Play the danger tone and warning beep
    pub sound_enabled: bool,
    /// Vibrate while in danger
    pub vibration_enabled: bool,
    /// Waveform passed to the vibration actuator
    pub vibration_pattern_ms: Vec<u64>,
}

impl Default for AlertPreferences {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            vibration_enabled: true,
            vibration_pattern_ms: DEFAULT_VIBRATION_PATTERN_MS.to_vec(),
        }
    }
}

/// Which effects are currently active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertState {
    pub danger_tone: bool,
    pub vibration: bool,
    pub banner: bool,
    pub warning_beep: bool,
    pub disconnected_indicator: bool,
}

impl AlertState {
    pub fn is_active(&self, effect: Effect) -> bool {
        match effect {
            Effect::WarningBeep => self.warning_beep,
            Effect::DangerTone => self.danger_tone,
            Effect::Vibration => self.vibration,
            Effect::Banner => self.banner,
            Effect::DisconnectedIndicator => self.disconnected_indicator,
        }
    }

    fn set(&mut self, effect: Effect, active: bool) {
        let flag = match effect {
            Effect::WarningBeep => &mut self.warning_beep,
            Effect::DangerTone => &mut self.danger_tone,
            Effect::Vibration => &mut self.vibration,
            Effect::Banner => &mut self.banner,
            Effect::DisconnectedIndicator => &mut self.disconnected_indicator,
        };
        *flag = active;
    }

    /// Any of the danger zone's effects is on
    pub fn danger_active(&self) -> bool {
        self.danger_tone || self.vibration || self.banner
    }

    /// No audible or haptic output
    pub fn is_silent(&self) -> bool {
        !self.danger_tone && !self.vibration && !self.warning_beep
    }

    /// Active effects in dispatch order
    pub fn active_effects(&self) -> Vec<Effect> {
        Effect::ALL
            .into_iter()
            .filter(|&effect| self.is_active(effect))
            .collect()
    }
}

/// Commands for the actuators, produced by one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActuatorDirective {
    /// Zone being entered
    pub zone: Zone,
    /// Effects to switch off, issued first
    pub retract: Vec<Effect>,
    /// Effects to switch on, issued after every retraction
    pub apply: Vec<Effect>,
    /// Waveform for `Effect::Vibration`
    pub vibration_pattern_ms: Vec<u64>,
}

impl ActuatorDirective {
    fn noop(zone: Zone) -> Self {
        Self {
            zone,
            retract: Vec::new(),
            apply: Vec::new(),
            vibration_pattern_ms: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.retract.is_empty() && self.apply.is_empty()
    }

    /// `(effect, active)` pairs in issue order
    pub fn commands(&self) -> impl Iterator<Item = (Effect, bool)> + '_ {
        self.retract
            .iter()
            .map(|&effect| (effect, false))
            .chain(self.apply.iter().map(|&effect| (effect, true)))
    }
}

/// Maps zone transitions to actuator directives.
///
/// Owns the only record of which effects are on, so leaving a zone always
/// switches off exactly what entering it switched on.
#[derive(Debug, Default)]
pub struct AlertDispatcher {
    preferences: AlertPreferences,
    state: AlertState,
}

impl AlertDispatcher {
    /// Create a new dispatcher
    pub fn new(preferences: AlertPreferences) -> Self {
        info!(
            "Creating alert dispatcher (sound: {}, vibration: {})",
            preferences.sound_enabled, preferences.vibration_enabled
        );
        Self {
            preferences,
            state: AlertState::default(),
        }
    }

    /// Compute the directive for a transition and record the resulting state
    pub fn dispatch(&mut self, event: &TransitionEvent) -> ActuatorDirective {
        if event.is_repeat() {
            debug!("Ignoring repeated transition into {}", event.to);
            return ActuatorDirective::noop(event.to);
        }

        let target = self.target_state(event.to);
        let retract: Vec<Effect> = Effect::ALL
            .into_iter()
            .filter(|&e| self.state.is_active(e) && !target.is_active(e))
            .collect();
        let apply: Vec<Effect> = Effect::ALL
            .into_iter()
            .filter(|&e| target.is_active(e) && !self.state.is_active(e))
            .collect();

        info!(
            "Entering {} from {}: retract {:?}, apply {:?}",
            event.to,
            event.from.map_or("startup", |z| z.as_str()),
            retract,
            apply
        );
        self.state = target;

        ActuatorDirective {
            zone: event.to,
            retract,
            apply,
            vibration_pattern_ms: self.preferences.vibration_pattern_ms.clone(),
        }
    }

    /// Directive switching every active effect off
    pub fn silence(&mut self) -> ActuatorDirective {
        let retract = self.state.active_effects();
        self.state = AlertState::default();
        ActuatorDirective {
            zone: Zone::Safe,
            retract,
            apply: Vec::new(),
            vibration_pattern_ms: Vec::new(),
        }
    }

    /// The warning beep finished playing on its own
    pub fn warning_finished(&mut self) {
        if self.state.warning_beep {
            debug!("Warning beep completed");
            self.state.set(Effect::WarningBeep, false);
        }
    }

    /// Replace preferences; applies from the next transition
    pub fn set_preferences(&mut self, preferences: AlertPreferences) {
        info!("Updating alert preferences: {:?}", preferences);
        self.preferences = preferences;
    }

    pub fn preferences(&self) -> &AlertPreferences {
        &self.preferences
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    fn target_state(&self, zone: Zone) -> AlertState {
        let mut target = AlertState::default();
        match zone {
            Zone::Danger => {
                target.set(Effect::DangerTone, self.preferences.sound_enabled);
                target.set(Effect::Vibration, self.preferences.vibration_enabled);
                target.set(Effect::Banner, true);
            }
            Zone::Warning => target.set(Effect::WarningBeep, self.preferences.sound_enabled),
            Zone::Safe => {}
            Zone::Disconnected => target.set(Effect::DisconnectedIndicator, true),
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(from: Option<Zone>, to: Zone) -> TransitionEvent {
        TransitionEvent {
            from,
            to,
            timestamp: Utc::now(),
            distance_cm: None,
        }
    }

    fn enter(dispatcher: &mut AlertDispatcher, from: Option<Zone>, to: Zone) -> ActuatorDirective {
        dispatcher.dispatch(&event(from, to))
    }

    #[test]
    fn test_enter_danger() {
        let mut dispatcher = AlertDispatcher::default();
        let directive = enter(&mut dispatcher, None, Zone::Danger);

        assert!(directive.retract.is_empty());
        assert_eq!(
            directive.apply,
            vec![Effect::DangerTone, Effect::Vibration, Effect::Banner]
        );
        assert_eq!(directive.vibration_pattern_ms, vec![0, 300, 200, 300]);
        assert!(dispatcher.state().danger_active());
    }

    #[test]
    fn test_warning_to_danger_retracts_beep_first() {
        let mut dispatcher = AlertDispatcher::default();
        enter(&mut dispatcher, Some(Zone::Safe), Zone::Warning);
        let directive = enter(&mut dispatcher, Some(Zone::Warning), Zone::Danger);

        assert_eq!(directive.retract, vec![Effect::WarningBeep]);
        let commands: Vec<_> = directive.commands().collect();
        assert_eq!(commands[0], (Effect::WarningBeep, false));

        let state = dispatcher.state();
        assert!(state.danger_tone);
        assert!(!state.warning_beep);
    }

    #[test]
    fn test_danger_to_warning_is_mutually_exclusive() {
        let mut dispatcher = AlertDispatcher::default();
        enter(&mut dispatcher, None, Zone::Danger);
        let directive = enter(&mut dispatcher, Some(Zone::Danger), Zone::Warning);

        assert_eq!(
            directive.retract,
            vec![Effect::DangerTone, Effect::Vibration, Effect::Banner]
        );
        assert_eq!(directive.apply, vec![Effect::WarningBeep]);

        let state = dispatcher.state();
        assert!(!(state.danger_active() && state.warning_beep));
    }

    #[test]
    fn test_safe_silences_everything() {
        let mut dispatcher = AlertDispatcher::default();
        enter(&mut dispatcher, None, Zone::Danger);
        let directive = enter(&mut dispatcher, Some(Zone::Danger), Zone::Safe);

        assert!(directive.apply.is_empty());
        assert_eq!(dispatcher.state(), AlertState::default());
    }

    #[test]
    fn test_disconnect_from_danger() {
        let mut dispatcher = AlertDispatcher::default();
        enter(&mut dispatcher, None, Zone::Danger);
        let directive = enter(&mut dispatcher, Some(Zone::Danger), Zone::Disconnected);

        assert_eq!(directive.apply, vec![Effect::DisconnectedIndicator]);
        let state = dispatcher.state();
        assert!(!state.danger_tone && !state.vibration && !state.banner);
        assert!(!state.warning_beep);
        assert!(state.disconnected_indicator);
    }

    #[test]
    fn test_reconnect_hides_indicator() {
        let mut dispatcher = AlertDispatcher::default();
        enter(&mut dispatcher, None, Zone::Disconnected);
        let directive = enter(&mut dispatcher, Some(Zone::Disconnected), Zone::Warning);

        assert_eq!(directive.retract, vec![Effect::DisconnectedIndicator]);
        assert_eq!(directive.apply, vec![Effect::WarningBeep]);
    }

    #[test]
    fn test_repeat_is_noop() {
        let mut dispatcher = AlertDispatcher::default();
        enter(&mut dispatcher, None, Zone::Danger);
        let before = dispatcher.state();

        let directive = enter(&mut dispatcher, Some(Zone::Danger), Zone::Danger);
        assert!(directive.is_empty());
        assert_eq!(dispatcher.state(), before);
    }

    #[test]
    fn test_sound_disabled() {
        let mut dispatcher = AlertDispatcher::new(AlertPreferences {
            sound_enabled: false,
            ..Default::default()
        });

        let directive = enter(&mut dispatcher, None, Zone::Danger);
        assert_eq!(directive.apply, vec![Effect::Vibration, Effect::Banner]);

        let directive = enter(&mut dispatcher, Some(Zone::Danger), Zone::Warning);
        assert!(directive.apply.is_empty());
        assert!(dispatcher.state().is_silent());
    }

    #[test]
    fn test_vibration_disabled() {
        let mut dispatcher = AlertDispatcher::default();
        dispatcher.set_preferences(AlertPreferences {
            vibration_enabled: false,
            ..Default::default()
        });

        let directive = enter(&mut dispatcher, None, Zone::Danger);
        assert_eq!(directive.apply, vec![Effect::DangerTone, Effect::Banner]);
    }

    #[test]
    fn test_warning_finished_clears_beep() {
        let mut dispatcher = AlertDispatcher::default();
        enter(&mut dispatcher, None, Zone::Warning);
        assert!(dispatcher.state().warning_beep);

        dispatcher.warning_finished();
        assert!(!dispatcher.state().warning_beep);

        // Nothing left to retract when danger follows
        let directive = enter(&mut dispatcher, Some(Zone::Warning), Zone::Danger);
        assert!(directive.retract.is_empty());
    }

    #[test]
    fn test_silence() {
        let mut dispatcher = AlertDispatcher::default();
        enter(&mut dispatcher, None, Zone::Danger);

        let directive = dispatcher.silence();
        assert_eq!(
            directive.retract,
            vec![Effect::DangerTone, Effect::Vibration, Effect::Banner]
        );
        assert!(dispatcher.silence().is_empty());
    }
}
