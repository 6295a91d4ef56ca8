//! Door events emitted by the classifier.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::sensor::Sample;

/// Kind of door fact reported for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorEventKind {
    Opened,
    Closed,
    /// Temperature falling while the door stays closed
    Cooling,
}

impl DoorEventKind {
    /// Label written to the event log
    pub fn log_label(&self) -> &'static str {
        match self {
            DoorEventKind::Opened => "Open",
            DoorEventKind::Closed => "Closed",
            DoorEventKind::Cooling => "Lowering",
        }
    }

    /// Signed door indicator reported to analytics; `None` for temperature-only events
    pub fn door_indicator(&self) -> Option<i32> {
        match self {
            DoorEventKind::Opened => Some(5),
            DoorEventKind::Closed => Some(-5),
            DoorEventKind::Cooling => None,
        }
    }
}

/// One emitted event, tagged with the sample that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorEvent {
    pub kind: DoorEventKind,
    pub timestamp: DateTime<Local>,
    pub axis: f64,
    pub temperature_celsius: f64,
}

impl DoorEvent {
    pub fn from_sample(kind: DoorEventKind, sample: &Sample) -> Self {
        Self {
            kind,
            timestamp: sample.timestamp,
            axis: sample.axis,
            temperature_celsius: sample.temperature_celsius,
        }
    }

    /// Local time of day, `HH:MM:SS`
    pub fn time_of_day(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}
