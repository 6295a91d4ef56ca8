//! Sample sources: the boundary to the sensor transport.
//!
//! The monitor pulls one [`RawReading`] per cycle from a [`SampleSource`]
//! and stamps it into a [`Sample`] using a [`Clock`]. The transport itself
//! (a BLE link to the sensor board in production) lives behind the trait;
//! this crate ships a replay source and a simulated fridge.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::SensorError;

mod replay;
mod simulated;

pub use replay::ReplaySource;
pub use simulated::{SimulatedFridge, SimulationScript};

/// Raw tuple as delivered by the sensor transport.
///
/// Buttons are press counts; anything above zero means pressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub axis_x: f64,
    pub axis_y: f64,
    pub axis_z: f64,
    pub temperature_celsius: f64,
    #[serde(default)]
    pub button_a: u8,
    #[serde(default)]
    pub button_b: u8,
}

impl RawReading {
    /// Reading with buttons released
    pub fn new(axis: [f64; 3], temperature_celsius: f64) -> Self {
        Self {
            axis_x: axis[0],
            axis_y: axis[1],
            axis_z: axis[2],
            temperature_celsius,
            button_a: 0,
            button_b: 0,
        }
    }

    pub fn with_buttons(mut self, button_a: u8, button_b: u8) -> Self {
        self.button_a = button_a;
        self.button_b = button_b;
        self
    }

    /// All three axes read exactly zero: the link returned nothing useful.
    pub fn is_degenerate(&self) -> bool {
        self.axis_x == 0.0 && self.axis_y == 0.0 && self.axis_z == 0.0
    }

    /// Classified axis and temperature are both finite numbers.
    pub fn has_finite_values(&self) -> bool {
        self.axis_x.is_finite() && self.temperature_celsius.is_finite()
    }

    /// Fit to be classified: not degenerate and free of NaN or infinity.
    pub fn is_usable(&self) -> bool {
        !self.is_degenerate() && self.has_finite_values()
    }
}

/// One classified-ready observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub axis: f64,
    pub temperature_celsius: f64,
    pub button_a: bool,
    pub button_b: bool,
    pub timestamp: DateTime<Local>,
}

impl Sample {
    pub fn from_reading(reading: &RawReading, timestamp: DateTime<Local>) -> Self {
        Self {
            axis: reading.axis_x,
            temperature_celsius: reading.temperature_celsius,
            button_a: reading.button_a > 0,
            button_b: reading.button_b > 0,
            timestamp,
        }
    }

    /// Operator asked to stop monitoring
    pub fn is_stop_request(&self) -> bool {
        self.button_a && self.button_b
    }

    /// Operator pressed at least one button
    pub fn any_button(&self) -> bool {
        self.button_a || self.button_b
    }
}

/// Port for pulling readings from the sensor transport.
///
/// `connect` failing is fatal for a session. `read` blocks until the
/// transport has a reading; finite sources report `SensorError::Exhausted`
/// when they run dry.
pub trait SampleSource {
    fn connect(&mut self) -> Result<(), SensorError>;

    fn read(&mut self) -> Result<RawReading, SensorError>;

    fn disconnect(&mut self) {}

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn connect(&mut self) -> Result<(), SensorError> {
        (**self).connect()
    }

    fn read(&mut self) -> Result<RawReading, SensorError> {
        (**self).read()
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Wall-clock source used to timestamp samples.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Default clock backed by `Local::now`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that advances by a fixed step on every call.
///
/// Replays and tests use it so timestamps are reproducible.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    next: std::cell::Cell<DateTime<Local>>,
    step: chrono::Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Local>, step: chrono::Duration) -> Self {
        Self {
            next: std::cell::Cell::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Local> {
        let current = self.next.get();
        self.next.set(current + self.step);
        current
    }
}
