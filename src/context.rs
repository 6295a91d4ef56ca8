// MonitorContext: owned handles for one monitoring session
//
// Holds the sample source, the event log, the optional notifier and the
// clock. The engine borrows it mutably once per cycle; nothing else touches
// these handles while a session runs.

use tracing::info;

use crate::analysis::DoorEvent;
use crate::config::MonitorConfig;
use crate::error::{log_sink_error, SensorError, SinkError};
use crate::sensor::{Clock, RawReading, SampleSource, SystemClock};
use crate::sinks::{AnalyticsNotifier, CsvEventLog, EventLog, Notifier};

/// Result of handing one event to the sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Logged, and notified if a notifier is configured
    Delivered,
    /// Logged, but the notifier failed
    LoggedOnly,
}

pub struct MonitorContext {
    source: Box<dyn SampleSource>,
    log: Box<dyn EventLog>,
    notifier: Option<Box<dyn Notifier>>,
    clock: Box<dyn Clock>,
}

impl MonitorContext {
    /// Context with the system clock and no notifier
    pub fn new(source: Box<dyn SampleSource>, log: Box<dyn EventLog>) -> Self {
        Self {
            source,
            log,
            notifier: None,
            clock: Box::new(SystemClock),
        }
    }

    /// Build the configured sinks around `source`.
    ///
    /// Creates the CSV log at `output.log_path` and, when `output.remote` is
    /// set, the analytics notifier.
    pub fn from_config(
        config: &MonitorConfig,
        source: Box<dyn SampleSource>,
    ) -> Result<Self, SinkError> {
        let log = CsvEventLog::create(&config.output.log_path)?;
        let mut context = Self::new(source, Box::new(log));
        if let Some(remote) = &config.output.remote {
            context = context.with_notifier(Box::new(AnalyticsNotifier::new(remote)?));
        }
        Ok(context)
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    pub fn describe(&self) -> String {
        let notifier = self
            .notifier
            .as_ref()
            .map(|n| n.describe())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "source={} log={} notifier={}",
            self.source.describe(),
            self.log.describe(),
            notifier
        )
    }

    pub(crate) fn connect(&mut self) -> Result<(), SensorError> {
        self.source.connect()?;
        info!(source = %self.source.describe(), "Connected to sensor source");
        Ok(())
    }

    pub(crate) fn disconnect(&mut self) {
        self.source.disconnect();
    }

    pub(crate) fn read(&mut self) -> Result<RawReading, SensorError> {
        self.source.read()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Log the event, then notify.
    ///
    /// A log failure is returned and must end the session, as is any
    /// notifier error that [`SinkError::is_fatal`] flags. Other notifier
    /// failures are logged and reported as [`Delivery::LoggedOnly`]; the log
    /// record is kept.
    pub(crate) fn deliver(&mut self, event: &DoorEvent) -> Result<Delivery, SinkError> {
        self.log.append(event)?;

        match self.notifier.as_mut() {
            Some(notifier) => match notifier.notify(event) {
                Ok(()) => Ok(Delivery::Delivered),
                Err(err) if err.is_fatal() => Err(err),
                Err(err) => {
                    log_sink_error(&err, "remote notifier");
                    Ok(Delivery::LoggedOnly)
                }
            },
            None => Ok(Delivery::Delivered),
        }
    }
}
