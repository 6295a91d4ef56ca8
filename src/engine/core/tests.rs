use super::*;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Local, TimeZone};

use crate::error::SinkError;
use crate::sensor::{RawReading, ReplaySource, SampleSource, SteppingClock};
use crate::sinks::{EventLog, Notifier};

#[derive(Clone, Default)]
struct SharedLog(Rc<RefCell<Vec<DoorEvent>>>);

impl EventLog for SharedLog {
    fn append(&mut self, event: &DoorEvent) -> Result<(), SinkError> {
        self.0.borrow_mut().push(event.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "shared".to_string()
    }
}

struct BrokenLog;

impl EventLog for BrokenLog {
    fn append(&mut self, _event: &DoorEvent) -> Result<(), SinkError> {
        Err(SinkError::LogWrite {
            details: "read-only filesystem".to_string(),
        })
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

struct DownNotifier(Rc<RefCell<u32>>);

impl Notifier for DownNotifier {
    fn notify(&mut self, _event: &DoorEvent) -> Result<(), SinkError> {
        *self.0.borrow_mut() += 1;
        Err(SinkError::NotifyFailed {
            status: None,
            details: "certificate verify failed".to_string(),
        })
    }

    fn describe(&self) -> String {
        "down".to_string()
    }
}

fn reading(axis: f64, temperature: f64) -> RawReading {
    RawReading::new([axis, 15.0, -40.0], temperature)
}

fn config(wait_for_start_button: bool) -> MonitorConfig {
    MonitorConfig {
        timing: TimingConfig::immediate(),
        wait_for_start_button,
        ..MonitorConfig::default()
    }
}

fn engine_with(readings: Vec<RawReading>, wait: bool) -> (MonitorEngine, SharedLog) {
    let log = SharedLog::default();
    let clock = SteppingClock::new(
        Local.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        chrono::Duration::seconds(1),
    );
    let mut source = ReplaySource::from_readings(readings);
    source.connect().unwrap();
    let context = MonitorContext::new(Box::new(source), Box::new(log.clone()))
        .with_clock(Box::new(clock));
    (MonitorEngine::new(context, &config(wait)), log)
}

fn logged_kinds(log: &SharedLog) -> Vec<DoorEventKind> {
    log.0.borrow().iter().map(|e| e.kind).collect()
}

#[test]
fn run_logs_events_until_source_exhausted() {
    let (mut engine, log) = engine_with(
        vec![
            reading(10.0, 5.0),
            reading(10.0, 4.0),
            reading(20.0, 4.0),
            reading(9.0, 4.0),
        ],
        false,
    );

    let summary = engine.run().unwrap();

    assert_eq!(
        logged_kinds(&log),
        vec![
            DoorEventKind::Closed,
            DoorEventKind::Cooling,
            DoorEventKind::Opened,
            DoorEventKind::Closed,
        ]
    );
    assert_eq!(summary.samples, 4);
    assert_eq!(summary.closed, 2);
    assert_eq!(summary.opened, 1);
    assert_eq!(summary.cooling, 1);
    assert_eq!(summary.stop_reason, Some(StopReason::SourceExhausted));
    assert_eq!(engine.phase(), LoopPhase::Stopped);
}

#[test]
fn events_carry_clock_timestamps() {
    let (mut engine, log) = engine_with(vec![reading(10.0, 5.0), reading(30.0, 5.0)], false);
    engine.run().unwrap();

    let times: Vec<String> = log.0.borrow().iter().map(|e| e.time_of_day()).collect();
    assert_eq!(times, vec!["09:00:00", "09:00:01"]);
}

#[test]
fn both_buttons_stop_after_the_cycle_is_logged() {
    let (mut engine, log) = engine_with(
        vec![
            reading(10.0, 5.0),
            reading(20.0, 5.0).with_buttons(1, 1),
            reading(10.0, 5.0),
        ],
        false,
    );

    assert_eq!(
        engine.step().unwrap(),
        StepOutcome::Continue(Duration::ZERO)
    );
    assert_eq!(
        engine.step().unwrap(),
        StepOutcome::Stopped(StopReason::OperatorRequest)
    );
    // the stop cycle's own event was logged, nothing extra for the press
    assert_eq!(
        logged_kinds(&log),
        vec![DoorEventKind::Closed, DoorEventKind::Opened]
    );
    // further steps do not read
    assert_eq!(
        engine.step().unwrap(),
        StepOutcome::Stopped(StopReason::OperatorRequest)
    );
    assert_eq!(engine.summary().samples, 2);
}

#[test]
fn single_button_does_not_stop_monitoring() {
    let (mut engine, _log) = engine_with(
        vec![reading(10.0, 5.0), reading(10.0, 5.0).with_buttons(1, 0)],
        false,
    );
    engine.step().unwrap();
    assert!(matches!(engine.step().unwrap(), StepOutcome::Continue(_)));
}

#[test]
fn degenerate_reading_is_skipped_with_cooldown() {
    let (mut engine, log) = engine_with(
        vec![
            reading(10.0, 5.0),
            RawReading::new([0.0, 0.0, 0.0], 0.0),
            reading(10.0, 5.0),
        ],
        false,
    );
    engine.timing.fault_cooldown_ms = 250;
    engine.timing.sample_interval_ms = 1_000;

    assert_eq!(
        engine.step().unwrap(),
        StepOutcome::Continue(Duration::from_millis(1_000))
    );
    assert_eq!(
        engine.step().unwrap(),
        StepOutcome::Continue(Duration::from_millis(250))
    );
    // the zero temperature never reached the classifier
    assert_eq!(engine.classifier().state().previous_temperature(), 5.0);
    engine.step().unwrap();

    assert_eq!(logged_kinds(&log), vec![DoorEventKind::Closed]);
    assert_eq!(engine.summary().skipped_readings, 1);
    assert_eq!(engine.summary().samples, 2);
}

#[test]
fn non_finite_first_reading_does_not_become_the_reference() {
    let (mut engine, log) = engine_with(
        vec![
            reading(f64::NAN, 5.0),
            reading(10.0, 4.0),
            reading(10.0, 3.0),
            reading(10.0, 2.0),
        ],
        false,
    );

    let summary = engine.run().unwrap();

    assert_eq!(
        logged_kinds(&log),
        vec![
            DoorEventKind::Closed,
            DoorEventKind::Cooling,
            DoorEventKind::Cooling,
        ]
    );
    assert_eq!(
        engine.classifier().state().closed_axis_reference(),
        Some(10.0)
    );
    assert!(engine.classifier().state().door_closed());
    assert_eq!(summary.skipped_readings, 1);
    assert_eq!(summary.samples, 3);
}

#[test]
fn non_finite_temperature_is_skipped_with_cooldown() {
    let (mut engine, log) = engine_with(
        vec![
            reading(10.0, 5.0),
            reading(10.0, f64::NAN),
            reading(f64::INFINITY, 5.0),
            reading(10.0, 4.0),
        ],
        false,
    );
    engine.timing.fault_cooldown_ms = 250;

    engine.step().unwrap();
    assert_eq!(
        engine.step().unwrap(),
        StepOutcome::Continue(Duration::from_millis(250))
    );
    assert_eq!(
        engine.step().unwrap(),
        StepOutcome::Continue(Duration::from_millis(250))
    );
    assert_eq!(engine.classifier().state().previous_temperature(), 5.0);
    engine.step().unwrap();

    // the genuine cooling reading after the bad ones is still reported
    assert_eq!(
        logged_kinds(&log),
        vec![DoorEventKind::Closed, DoorEventKind::Cooling]
    );
    assert_eq!(engine.summary().skipped_readings, 2);
}

#[test]
fn awaiting_start_ignores_readings_until_a_button() {
    let (mut engine, log) = engine_with(
        vec![
            reading(50.0, 9.0),
            reading(50.0, 9.0),
            reading(50.0, 9.0).with_buttons(0, 1),
            reading(10.0, 5.0),
            reading(10.0, 4.0),
        ],
        true,
    );
    assert_eq!(engine.phase(), LoopPhase::AwaitingStart);

    engine.step().unwrap();
    engine.step().unwrap();
    assert_eq!(engine.phase(), LoopPhase::AwaitingStart);
    engine.step().unwrap();
    assert_eq!(engine.phase(), LoopPhase::Monitoring);

    let summary = engine.run_remaining();
    assert_eq!(
        logged_kinds(&log),
        vec![DoorEventKind::Closed, DoorEventKind::Cooling]
    );
    // bootstrap happened on the first post-start reading
    assert_eq!(
        engine.classifier().state().closed_axis_reference(),
        Some(10.0)
    );
    assert_eq!(summary.samples, 2);
}

#[test]
fn both_buttons_while_awaiting_start_stop_without_events() {
    let (mut engine, log) = engine_with(
        vec![reading(10.0, 5.0).with_buttons(1, 1), reading(10.0, 5.0)],
        true,
    );
    let summary = engine.run().unwrap();
    assert!(log.0.borrow().is_empty());
    assert_eq!(summary.samples, 0);
    assert_eq!(summary.stop_reason, Some(StopReason::OperatorRequest));
}

#[test]
fn log_failure_is_fatal() {
    let context = MonitorContext::new(
        Box::new(ReplaySource::from_readings(vec![reading(10.0, 5.0)])),
        Box::new(BrokenLog),
    );
    let mut engine = MonitorEngine::new(context, &config(false));

    match engine.run() {
        Err(MonitorError::Sink(SinkError::LogWrite { .. })) => {}
        other => panic!("Expected LogWrite failure, got {:?}", other),
    }
}

#[test]
fn notifier_failure_is_counted_and_loop_continues() {
    let calls = Rc::new(RefCell::new(0));
    let log = SharedLog::default();
    let context = MonitorContext::new(
        Box::new(ReplaySource::from_readings(vec![
            reading(10.0, 5.0),
            reading(30.0, 5.0),
            reading(10.0, 5.0),
        ])),
        Box::new(log.clone()),
    )
    .with_notifier(Box::new(DownNotifier(calls.clone())));
    let mut engine = MonitorEngine::new(context, &config(false));

    let summary = engine.run().unwrap();

    assert_eq!(log.0.borrow().len(), 3);
    assert_eq!(*calls.borrow(), 3);
    assert_eq!(summary.notifier_failures, 3);
    assert_eq!(summary.stop_reason, Some(StopReason::SourceExhausted));
}

#[test]
fn fatal_notifier_error_ends_session() {
    struct MirrorNotifier;

    impl Notifier for MirrorNotifier {
        fn notify(&mut self, _event: &DoorEvent) -> Result<(), SinkError> {
            Err(SinkError::LogWrite {
                details: "mirror volume unmounted".to_string(),
            })
        }

        fn describe(&self) -> String {
            "mirror".to_string()
        }
    }

    let log = SharedLog::default();
    let context = MonitorContext::new(
        Box::new(ReplaySource::from_readings(vec![reading(10.0, 5.0)])),
        Box::new(log.clone()),
    )
    .with_notifier(Box::new(MirrorNotifier));
    assert!(context.has_notifier());
    let mut engine = MonitorEngine::new(context, &config(false));

    match engine.run() {
        Err(MonitorError::Sink(err)) => assert!(err.is_fatal()),
        other => panic!("Expected fatal sink error, got {:?}", other),
    }
    // the local record was written before the notifier ran
    assert_eq!(log.0.borrow().len(), 1);
}

#[test]
fn read_failure_is_fatal() {
    struct Unplugged;

    impl SampleSource for Unplugged {
        fn connect(&mut self) -> Result<(), SensorError> {
            Ok(())
        }

        fn read(&mut self) -> Result<RawReading, SensorError> {
            Err(SensorError::ReadFailed {
                details: "link lost".to_string(),
            })
        }

        fn describe(&self) -> String {
            "unplugged".to_string()
        }
    }

    let context = MonitorContext::new(Box::new(Unplugged), Box::new(SharedLog::default()));
    let mut engine = MonitorEngine::new(context, &config(false));
    match engine.run() {
        Err(MonitorError::Sensor(SensorError::ReadFailed { .. })) => {}
        other => panic!("Expected ReadFailed, got {:?}", other),
    }
}

impl MonitorEngine {
    fn run_remaining(&mut self) -> SessionSummary {
        self.poll_until_stopped().unwrap()
    }
}
