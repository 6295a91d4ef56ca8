//! MonitorEngine: the single-threaded polling loop.
//!
//! One iteration reads one sample, classifies it and hands any resulting
//! event to the sinks before the next read. The loop optionally waits for a
//! button press before monitoring, and stops after the cycle in which both
//! buttons are held, or when a finite source runs dry.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::{DoorClassifier, DoorEvent, DoorEventKind};
use crate::config::{MonitorConfig, TimingConfig};
use crate::context::{Delivery, MonitorContext};
use crate::error::{log_sensor_error, log_sink_error, MonitorError, SensorError};
use crate::sensor::Sample;

/// Loop phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopPhase {
    /// Reading, but not classifying, until a button is pressed
    AwaitingStart,
    Monitoring,
    Stopped,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Both buttons pressed
    OperatorRequest,
    /// Finite source has no more readings
    SourceExhausted,
}

/// What the caller should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Wait this long, then step again
    Continue(Duration),
    Stopped(StopReason),
}

/// Counters for a finished session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Samples classified (unusable and pre-start readings excluded)
    pub samples: u64,
    pub skipped_readings: u64,
    pub opened: u64,
    pub closed: u64,
    pub cooling: u64,
    pub notifier_failures: u64,
    pub stop_reason: Option<StopReason>,
}

impl SessionSummary {
    pub fn events(&self) -> u64 {
        self.opened + self.closed + self.cooling
    }

    fn record(&mut self, kind: DoorEventKind) {
        match kind {
            DoorEventKind::Opened => self.opened += 1,
            DoorEventKind::Closed => self.closed += 1,
            DoorEventKind::Cooling => self.cooling += 1,
        }
    }
}

pub struct MonitorEngine {
    context: MonitorContext,
    classifier: DoorClassifier,
    timing: TimingConfig,
    phase: LoopPhase,
    summary: SessionSummary,
}

impl MonitorEngine {
    pub fn new(context: MonitorContext, config: &MonitorConfig) -> Self {
        let phase = if config.wait_for_start_button {
            LoopPhase::AwaitingStart
        } else {
            LoopPhase::Monitoring
        };
        Self {
            context,
            classifier: DoorClassifier::from_config(&config.estimator),
            timing: config.timing.clone(),
            phase,
            summary: SessionSummary::default(),
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn classifier(&self) -> &DoorClassifier {
        &self.classifier
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Connect, poll until stopped, disconnect.
    ///
    /// Returns an error only for a failed connect, a failed sensor read or a
    /// failed event log write.
    pub fn run(&mut self) -> Result<SessionSummary, MonitorError> {
        self.context.connect().map_err(|err| {
            log_sensor_error(&err, "connect");
            err
        })?;
        info!(
            context = %self.context.describe(),
            remote = self.context.has_notifier(),
            "Monitor session started"
        );

        match self.phase {
            LoopPhase::AwaitingStart => {
                info!("Press either button to start monitoring; both buttons stop")
            }
            _ => {
                info!(
                    delay_ms = self.timing.settle_delay_ms,
                    "Press both buttons anytime to stop monitoring; settling before first reading"
                );
                pause(self.timing.settle_delay());
            }
        }

        let result = self.poll_until_stopped();
        self.context.disconnect();

        let summary = result?;
        info!(
            samples = summary.samples,
            events = summary.events(),
            skipped = summary.skipped_readings,
            notifier_failures = summary.notifier_failures,
            stop_reason = ?summary.stop_reason,
            "Monitor session finished"
        );
        Ok(summary)
    }

    fn poll_until_stopped(&mut self) -> Result<SessionSummary, MonitorError> {
        loop {
            match self.step()? {
                StepOutcome::Continue(delay) => pause(delay),
                StepOutcome::Stopped(_) => return Ok(self.summary.clone()),
            }
        }
    }

    /// Run one polling cycle without sleeping.
    pub fn step(&mut self) -> Result<StepOutcome, MonitorError> {
        if let LoopPhase::Stopped = self.phase {
            return Ok(StepOutcome::Stopped(
                self.summary
                    .stop_reason
                    .unwrap_or(StopReason::OperatorRequest),
            ));
        }

        let reading = match self.context.read() {
            Ok(reading) => reading,
            Err(SensorError::Exhausted) => {
                info!("Sensor source exhausted");
                return Ok(self.stop(StopReason::SourceExhausted));
            }
            Err(err) => {
                log_sensor_error(&err, "read");
                return Err(err.into());
            }
        };
        let sample = Sample::from_reading(&reading, self.context.clock().now());

        if self.phase == LoopPhase::AwaitingStart {
            if sample.is_stop_request() {
                return Ok(self.stop(StopReason::OperatorRequest));
            }
            if sample.any_button() {
                self.phase = LoopPhase::Monitoring;
                info!(
                    delay_ms = self.timing.settle_delay_ms,
                    "Start button pressed; monitoring"
                );
                return Ok(StepOutcome::Continue(self.timing.settle_delay()));
            }
            return Ok(StepOutcome::Continue(self.timing.sample_interval()));
        }

        let delay = if !reading.is_usable() {
            self.summary.skipped_readings += 1;
            let reason = if reading.is_degenerate() {
                "all axes zero"
            } else {
                "non-finite value"
            };
            warn!(
                cooldown_ms = self.timing.fault_cooldown_ms,
                axis = reading.axis_x,
                temperature = reading.temperature_celsius,
                reason,
                "Reading skipped"
            );
            self.timing.fault_cooldown()
        } else {
            self.summary.samples += 1;
            if let Some(event) = self.classifier.observe(&sample) {
                self.emit(&event)?;
            }
            self.timing.sample_interval()
        };

        if sample.is_stop_request() {
            info!("Both buttons pressed; stopping");
            return Ok(self.stop(StopReason::OperatorRequest));
        }
        Ok(StepOutcome::Continue(delay))
    }

    fn emit(&mut self, event: &DoorEvent) -> Result<(), MonitorError> {
        let state = self.classifier.state();
        info!(
            time = %event.time_of_day(),
            event = event.kind.log_label(),
            door_closed = state.door_closed(),
            axis = event.axis,
            closed_axis = ?state.closed_axis_reference(),
            temperature = event.temperature_celsius,
            "Door event"
        );

        let delivery = self.context.deliver(event).map_err(|err| {
            log_sink_error(&err, "event log");
            err
        })?;
        self.summary.record(event.kind);
        if delivery == Delivery::LoggedOnly {
            self.summary.notifier_failures += 1;
        }
        debug!(?delivery, "Event delivered");
        Ok(())
    }

    fn stop(&mut self, reason: StopReason) -> StepOutcome {
        self.phase = LoopPhase::Stopped;
        self.summary.stop_reason = Some(reason);
        StepOutcome::Stopped(reason)
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests;
