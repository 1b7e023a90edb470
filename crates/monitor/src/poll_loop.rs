//! Poll Loop Implementation

use crate::error::MonitorError;
use crate::settings::MonitorConfig;
use crate::shutdown::ShutdownSignal;
use crate::status::MonitorStatus;
use alerting::{apply_directive, Actuators, AlertDispatcher, AlertPreferences};
use chrono::Utc;
use metrics::{counter, gauge};
use proximity::{TransitionDetector, TransitionEvent, Zone, ZoneClassifier};
use sensor_client::{DistanceSource, Reading, SensorClient};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Zone the reading was classified into
    pub zone: Zone,
    /// Valid distance, if any
    pub distance_cm: Option<u32>,
    /// Transition emitted this tick
    pub event: Option<TransitionEvent>,
}

/// Drives sensor polling, zone tracking and alert dispatch.
///
/// Ticks run strictly one after another: a tick's dispatch completes before
/// the next poll starts.
pub struct PollLoop<S, A> {
    source: S,
    actuators: A,
    classifier: ZoneClassifier,
    detector: TransitionDetector,
    dispatcher: AlertDispatcher,
    poll_interval: Duration,
    consecutive_failures: u32,
    ticks: u64,
    status_tx: watch::Sender<MonitorStatus>,
}

impl<A: Actuators> PollLoop<SensorClient, A> {
    /// Build a loop polling the configured HTTP endpoint
    pub fn from_config(config: &MonitorConfig, actuators: A) -> Result<Self, MonitorError> {
        config.validate()?;
        let client = SensorClient::new(&config.endpoint, config.request_timeout())?;
        info!("Polling sensor at {}", client.endpoint());
        Self::new(config, client, actuators)
    }
}

impl<S, A> PollLoop<S, A>
where
    S: DistanceSource,
    A: Actuators,
{
    /// Create a new poll loop over an arbitrary distance source
    pub fn new(config: &MonitorConfig, source: S, actuators: A) -> Result<Self, MonitorError> {
        config.validate()?;
        let thresholds = config.thresholds()?;

        info!(
            "Creating poll loop: interval {}ms, danger < {}cm, warning <= {}cm",
            config.poll_interval_ms,
            thresholds.danger_max(),
            thresholds.warning_max()
        );

        let (status_tx, _) = watch::channel(MonitorStatus::default());

        Ok(Self {
            source,
            actuators,
            classifier: ZoneClassifier::new(thresholds),
            detector: TransitionDetector::new(),
            dispatcher: AlertDispatcher::new(config.alerts.clone()),
            poll_interval: config.poll_interval(),
            consecutive_failures: 0,
            ticks: 0,
            status_tx,
        })
    }

    /// Run one poll → classify → detect → dispatch cycle
    pub async fn tick(&mut self) -> TickOutcome {
        counter!("proximity_polls_total").increment(1);

        let outcome = self.source.poll().await;
        let zone = self.classifier.classify(&outcome);
        let distance_cm = outcome.as_ref().ok().and_then(Reading::distance_cm);
        let observed_at = outcome
            .as_ref()
            .map_or_else(|_| Utc::now(), Reading::received_at);

        match &outcome {
            Ok(reading) => {
                if self.consecutive_failures > 0 {
                    info!("Sensor reachable again after {} failed polls", self.consecutive_failures);
                }
                self.consecutive_failures = 0;
                match distance_cm {
                    Some(d) => gauge!("proximity_distance_cm").set(f64::from(d)),
                    None => debug!("Invalid distance {} from sensor", reading.raw()),
                }
            }
            Err(e) => {
                self.consecutive_failures += 1;
                counter!("proximity_poll_failures_total").increment(1);
                if self.consecutive_failures == 1 {
                    warn!("Sensor poll failed: {}", e);
                } else {
                    debug!("Sensor poll failed ({} in a row): {}", self.consecutive_failures, e);
                }
            }
        }

        let event = self.detector.observe_at(zone, distance_cm, observed_at);
        if let Some(event) = &event {
            counter!("proximity_transitions_total", "zone" => event.to.as_str()).increment(1);
            let directive = self.dispatcher.dispatch(event);
            apply_directive(&directive, &mut self.actuators);
        }

        self.ticks += 1;
        self.publish(zone, distance_cm, event.as_ref());

        TickOutcome {
            zone,
            distance_cm,
            event,
        }
    }

    /// Tick on the configured interval until shutdown is requested.
    ///
    /// Shutdown is honoured while waiting for the next tick and while a
    /// request is in flight. Every active alert is switched off on exit.
    pub async fn run(&mut self, mut shutdown: ShutdownSignal) {
        info!("Starting poll loop");

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                _ = interval.tick() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown.wait() => {
                    debug!("Shutdown during in-flight poll");
                    break;
                }
                _ = self.tick() => {}
            }
        }

        self.silence();
        info!("Poll loop stopped after {} ticks", self.ticks);
    }

    /// Switch off every active alert.
    ///
    /// The zone history is forgotten too, so the next tick re-enters its zone
    /// and re-arms that zone's alerts.
    pub fn silence(&mut self) {
        self.detector.reset();
        let directive = self.dispatcher.silence();
        if !directive.is_empty() {
            info!("Silencing {} active alert effects", directive.retract.len());
            apply_directive(&directive, &mut self.actuators);
        }
    }

    /// Status updates, one per tick
    pub fn subscribe(&self) -> watch::Receiver<MonitorStatus> {
        self.status_tx.subscribe()
    }

    pub fn status(&self) -> MonitorStatus {
        self.status_tx.borrow().clone()
    }

    pub fn current_zone(&self) -> Option<Zone> {
        self.detector.current()
    }

    /// Replace alert preferences; applies from the next transition
    pub fn set_preferences(&mut self, preferences: AlertPreferences) {
        self.dispatcher.set_preferences(preferences);
    }

    /// The warning beep finished playing
    pub fn warning_finished(&mut self) {
        self.dispatcher.warning_finished();
    }

    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    pub fn actuators_mut(&mut self) -> &mut A {
        &mut self.actuators
    }

    fn publish(&self, zone: Zone, distance_cm: Option<u32>, event: Option<&TransitionEvent>) {
        let consecutive_failures = self.consecutive_failures;
        let ticks = self.ticks;
        self.status_tx.send_modify(|status| {
            status.zone = Some(zone);
            status.distance_cm = distance_cm;
            if let Some(event) = event {
                status.last_transition = Some(event.timestamp);
            }
            status.consecutive_failures = consecutive_failures;
            status.ticks = ticks;
        });
    }
}
