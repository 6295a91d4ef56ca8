// CalibrationState - closed-door baseline for the door estimator
//
// The estimator has no door sensor. It treats the magnetometer axis value
// observed while the fridge is sealed and cooling as the "closed" reference,
// and judges later readings by how far their magnitude drifts from it.
//
// The reference starts unset and is taken from the first sample. After that
// it is only re-anchored while the door is believed closed and the
// temperature is falling.

use serde::{Deserialize, Serialize};

/// Default allowed jitter around the closed reference, in axis units
pub const DEFAULT_SHAKE_TOLERANCE: f64 = 2.0;

/// Closed interval of axis magnitudes consistent with a closed door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub lower: f64,
    pub upper: f64,
}

impl ToleranceBand {
    /// Band `[|reference| - tolerance, |reference| + tolerance]`
    ///
    /// Only magnitudes matter: the sign of the reference depends on how the
    /// board is mounted.
    pub fn around(reference: f64, tolerance: f64) -> Self {
        let magnitude = reference.abs();
        let tolerance = tolerance.abs();
        Self {
            lower: magnitude - tolerance,
            upper: magnitude + tolerance,
        }
    }

    /// Whether `|axis|` lies inside the band (bounds inclusive)
    pub fn contains(&self, axis: f64) -> bool {
        let magnitude = axis.abs();
        magnitude >= self.lower && magnitude <= self.upper
    }
}

/// Mutable estimator state, owned by a single estimator for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    /// Axis value believed to correspond to a closed door; `None` until the
    /// first sample arrives
    closed_axis_reference: Option<f64>,
    /// Temperature seen on the previous cycle
    previous_temperature: f64,
    /// Current belief about the door
    door_closed: bool,
    /// Allowed jitter around the reference
    shake_tolerance: f64,
}

impl CalibrationState {
    pub fn new(shake_tolerance: f64) -> Self {
        Self {
            closed_axis_reference: None,
            previous_temperature: 0.0,
            door_closed: false,
            shake_tolerance,
        }
    }

    pub fn new_default() -> Self {
        Self::new(DEFAULT_SHAKE_TOLERANCE)
    }

    pub fn is_initialized(&self) -> bool {
        self.closed_axis_reference.is_some()
    }

    pub fn closed_axis_reference(&self) -> Option<f64> {
        self.closed_axis_reference
    }

    pub fn previous_temperature(&self) -> f64 {
        self.previous_temperature
    }

    pub fn door_closed(&self) -> bool {
        self.door_closed
    }

    pub fn shake_tolerance(&self) -> f64 {
        self.shake_tolerance
    }

    /// Band around the current reference, `None` before bootstrap
    pub fn tolerance_band(&self) -> Option<ToleranceBand> {
        self.closed_axis_reference
            .map(|reference| ToleranceBand::around(reference, self.shake_tolerance))
    }

    /// Seed from the first sample: the door is assumed closed at start.
    pub(crate) fn bootstrap(&mut self, axis: f64, temperature: f64) {
        self.closed_axis_reference = Some(axis);
        self.previous_temperature = temperature;
        self.door_closed = true;
    }

    pub(crate) fn set_door_closed(&mut self, closed: bool) {
        self.door_closed = closed;
    }

    /// Move the reference to a new resting position.
    ///
    /// Callers must only do this while the door is believed closed.
    pub(crate) fn reanchor(&mut self, axis: f64) {
        debug_assert!(self.door_closed, "reference re-anchored while door open");
        self.closed_axis_reference = Some(axis);
    }

    pub(crate) fn advance_temperature(&mut self, temperature: f64) {
        self.previous_temperature = temperature;
    }
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self::new_default()
    }
}
