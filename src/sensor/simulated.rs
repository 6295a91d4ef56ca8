//! Deterministic fridge simulation.
//!
//! Produces a door that alternates between closed and open stretches. While
//! closed the temperature decays toward the setpoint, while open it climbs
//! and the magnetometer axis swings away from its resting value. Readings
//! carry seeded jitter and occasional all-zero dropouts, and the final
//! reading presses both buttons so a monitor run ends on its own.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{RawReading, SampleSource};
use crate::error::SensorError;

/// Shape of a simulated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationScript {
    /// Axis value while the door rests closed
    pub closed_axis: f64,
    /// Axis displacement while the door is open
    pub open_axis_offset: f64,
    /// Peak uniform jitter added to the axis
    pub axis_jitter: f64,
    pub start_temperature: f64,
    pub setpoint_temperature: f64,
    /// Fraction of the gap to the setpoint closed per closed sample
    pub cooling_rate: f64,
    /// Degrees gained per open sample
    pub warming_per_sample: f64,
    pub closed_samples: u32,
    pub open_samples: u32,
    /// Number of closed+open cycles before the stop press
    pub cycles: u32,
    /// Probability of an all-zero dropout reading
    pub dropout_probability: f64,
}

impl Default for SimulationScript {
    fn default() -> Self {
        Self {
            closed_axis: -24.0,
            open_axis_offset: 9.0,
            axis_jitter: 0.6,
            start_temperature: 7.0,
            setpoint_temperature: 3.0,
            cooling_rate: 0.08,
            warming_per_sample: 0.5,
            closed_samples: 20,
            open_samples: 6,
            cycles: 3,
            dropout_probability: 0.02,
        }
    }
}

/// Seeded simulated sensor.
pub struct SimulatedFridge {
    script: SimulationScript,
    seed: u64,
    rng: StdRng,
    temperature: f64,
    tick: u32,
    connected: bool,
    finished: bool,
}

impl SimulatedFridge {
    pub fn new(script: SimulationScript, seed: u64) -> Self {
        let temperature = script.start_temperature;
        Self {
            script,
            seed,
            rng: StdRng::seed_from_u64(seed),
            temperature,
            tick: 0,
            connected: false,
            finished: false,
        }
    }

    fn period(&self) -> u32 {
        self.script.closed_samples + self.script.open_samples
    }

    fn total_ticks(&self) -> u32 {
        self.period().saturating_mul(self.script.cycles)
    }

    fn door_open_at(&self, tick: u32) -> bool {
        let period = self.period();
        period > 0 && tick % period >= self.script.closed_samples
    }

    fn next_reading(&mut self) -> RawReading {
        let open = self.door_open_at(self.tick);
        let script = &self.script;

        if open {
            self.temperature += script.warming_per_sample;
        } else {
            self.temperature -= (self.temperature - script.setpoint_temperature) * script.cooling_rate;
        }

        let jitter = if script.axis_jitter > 0.0 {
            self.rng.gen_range(-script.axis_jitter..=script.axis_jitter)
        } else {
            0.0
        };
        let axis_x = if open {
            script.closed_axis + script.open_axis_offset + jitter
        } else {
            script.closed_axis + jitter
        };
        let axis_y = 11.0 + self.rng.gen_range(-1.0..=1.0);
        let axis_z = -37.0 + self.rng.gen_range(-1.0..=1.0);

        // the board reports whole degrees
        RawReading::new([axis_x, axis_y, axis_z], self.temperature.round())
    }
}

impl SampleSource for SimulatedFridge {
    fn connect(&mut self) -> Result<(), SensorError> {
        self.connected = true;
        Ok(())
    }

    fn read(&mut self) -> Result<RawReading, SensorError> {
        if !self.connected {
            return Err(SensorError::NotConnected);
        }
        if self.finished {
            return Err(SensorError::Exhausted);
        }

        if self.script.dropout_probability > 0.0
            && self.rng.gen_bool(self.script.dropout_probability.min(1.0))
        {
            return Ok(RawReading::new([0.0, 0.0, 0.0], 0.0));
        }

        let mut reading = self.next_reading();
        self.tick += 1;
        if self.tick >= self.total_ticks() {
            self.finished = true;
            reading = reading.with_buttons(1, 1);
        }
        Ok(reading)
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn describe(&self) -> String {
        format!("simulated:seed={}", self.seed)
    }
}
