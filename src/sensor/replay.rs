//! Replay of recorded raw readings.
//!
//! Replay files are CSV with a header row naming the [`RawReading`] fields
//! (`axis_x,axis_y,axis_z,temperature_celsius,button_a,button_b`); extra
//! columns such as `seconds_since_start` written by the recorder are ignored.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::{RawReading, SampleSource};
use crate::error::SensorError;

enum ReplayOrigin {
    File(PathBuf),
    Memory,
}

/// Finite sample source backed by a CSV file or an in-memory list.
pub struct ReplaySource {
    origin: ReplayOrigin,
    pending: VecDeque<RawReading>,
    connected: bool,
}

impl ReplaySource {
    /// Replay readings from a CSV file; the file is read on `connect`.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            origin: ReplayOrigin::File(path.as_ref().to_path_buf()),
            pending: VecDeque::new(),
            connected: false,
        }
    }

    /// Replay the given readings in order.
    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = RawReading>,
    {
        Self {
            origin: ReplayOrigin::Memory,
            pending: readings.into_iter().collect(),
            connected: false,
        }
    }

    /// Readings not yet consumed
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    fn load_csv(path: &Path) -> Result<VecDeque<RawReading>, SensorError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|err| SensorError::ConnectFailed {
                details: format!("{}: {}", path.display(), err),
            })?;

        let mut readings = VecDeque::new();
        for (index, record) in reader.deserialize::<RawReading>().enumerate() {
            let reading = record.map_err(|err| SensorError::InvalidReading {
                // +2: header row, 1-based line numbers
                reason: format!("{} line {}: {}", path.display(), index + 2, err),
            })?;
            readings.push_back(reading);
        }
        Ok(readings)
    }
}

impl SampleSource for ReplaySource {
    fn connect(&mut self) -> Result<(), SensorError> {
        if let ReplayOrigin::File(path) = &self.origin {
            self.pending = Self::load_csv(path)?;
            tracing::info!(
                path = %path.display(),
                readings = self.pending.len(),
                "Loaded replay file"
            );
        }
        self.connected = true;
        Ok(())
    }

    fn read(&mut self) -> Result<RawReading, SensorError> {
        if !self.connected {
            return Err(SensorError::NotConnected);
        }
        self.pending.pop_front().ok_or(SensorError::Exhausted)
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn describe(&self) -> String {
        match &self.origin {
            ReplayOrigin::File(path) => format!("replay:{}", path.display()),
            ReplayOrigin::Memory => format!("replay:memory({} pending)", self.pending.len()),
        }
    }
}
