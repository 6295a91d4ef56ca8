//! Event sinks: the system-of-record log and the best-effort notifier.
//!
//! Every event is appended to the [`EventLog`] first; a log failure ends the
//! session. The [`Notifier`] is called afterwards and its failures are only
//! reported.

use crate::analysis::DoorEvent;
use crate::error::SinkError;

mod analytics;
mod csv_log;
mod json_lines;

pub use analytics::{facts_for, AnalyticsFact, AnalyticsNotifier};
pub use csv_log::{CsvEventLog, LOG_HEADER};
pub use json_lines::JsonLinesLog;

/// Append-only, synchronous event log.
pub trait EventLog {
    /// Persist one event; must be durable when this returns `Ok`.
    fn append(&mut self, event: &DoorEvent) -> Result<(), SinkError>;

    fn describe(&self) -> String;
}

/// Best-effort remote notification.
pub trait Notifier {
    fn notify(&mut self, event: &DoorEvent) -> Result<(), SinkError>;

    fn describe(&self) -> String;
}

impl<L: EventLog + ?Sized> EventLog for Box<L> {
    fn append(&mut self, event: &DoorEvent) -> Result<(), SinkError> {
        (**self).append(event)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, event: &DoorEvent) -> Result<(), SinkError> {
        (**self).notify(event)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
