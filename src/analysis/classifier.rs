// DoorClassifier - hysteresis door state estimation
//
// Infers the door state from a single magnetometer axis and the direction
// of temperature change. Every cycle after bootstrap runs four checks in a
// fixed order:
//
// 1. Within tolerance of the closed reference: an open door becomes closed.
// 2. Temperature strictly falling: re-anchor the reference to the current
//    axis and report `Cooling` if the door was already closed.
// 3. Out of tolerance: movement wins, a closed door becomes open.
// 4. Remember the temperature for the next cycle.
//
// The tolerance band is taken from the reference in force at the start of
// the cycle, so checks 1 and 3 agree on what "within" means. Movement is
// authoritative: an out-of-tolerance sample never re-anchors the reference
// and never reports `Cooling`, even if it is colder.
//
// Opened/Closed are edge-triggered, Cooling is level-triggered and at most
// one event is produced per sample.

use crate::analysis::events::{DoorEvent, DoorEventKind};
use crate::calibration::state::CalibrationState;
use crate::config::EstimatorConfig;
use crate::sensor::Sample;

/// Per-sample door state estimator.
#[derive(Debug, Clone)]
pub struct DoorClassifier {
    state: CalibrationState,
    report_cooling: bool,
}

impl DoorClassifier {
    /// Create an uninitialized classifier
    ///
    /// # Arguments
    /// * `shake_tolerance` - allowed jitter around the closed reference
    /// * `report_cooling` - emit `Cooling` while the door stays closed
    pub fn new(shake_tolerance: f64, report_cooling: bool) -> Self {
        Self {
            state: CalibrationState::new(shake_tolerance),
            report_cooling,
        }
    }

    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self::new(config.shake_tolerance, config.report_cooling)
    }

    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// Classify one sample, returning the event it produces, if any.
    pub fn observe(&mut self, sample: &Sample) -> Option<DoorEvent> {
        let band = match self.state.tolerance_band() {
            Some(band) => band,
            None => {
                self.state
                    .bootstrap(sample.axis, sample.temperature_celsius);
                tracing::info!(
                    reference = sample.axis,
                    temperature = sample.temperature_celsius,
                    "Initializing door as closed"
                );
                return Some(DoorEvent::from_sample(DoorEventKind::Closed, sample));
            }
        };

        let was_closed = self.state.door_closed();
        let within = band.contains(sample.axis);
        let colder = sample.temperature_celsius < self.state.previous_temperature();
        let mut verdict = None;

        if within && !was_closed {
            self.state.set_door_closed(true);
            verdict = Some(DoorEventKind::Closed);
        }

        if colder && within {
            self.state.reanchor(sample.axis);
            if was_closed && self.report_cooling {
                verdict = Some(DoorEventKind::Cooling);
            }
        }

        if !within && self.state.door_closed() {
            self.state.set_door_closed(false);
            verdict = Some(DoorEventKind::Opened);
        }

        self.state.advance_temperature(sample.temperature_celsius);

        if let Some(kind) = verdict {
            tracing::debug!(
                ?kind,
                axis = sample.axis,
                lower = band.lower,
                upper = band.upper,
                colder,
                "Door event"
            );
        }
        verdict.map(|kind| DoorEvent::from_sample(kind, sample))
    }

    /// Classify a whole sequence, collecting the emitted events.
    pub fn observe_all<'a, I>(&mut self, samples: I) -> Vec<DoorEvent>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        samples
            .into_iter()
            .filter_map(|sample| self.observe(sample))
            .collect()
    }
}

impl Default for DoorClassifier {
    fn default() -> Self {
        Self::from_config(&EstimatorConfig::default())
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
