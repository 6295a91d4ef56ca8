//! Engine module housing the monitor polling loop.
//!
//! `MonitorEngine` drives a `MonitorContext` (source + sinks) through the
//! `AwaitingStart -> Monitoring -> Stopped` phases, one sample per cycle.

pub mod core;

pub use core::{LoopPhase, MonitorEngine, SessionSummary, StepOutcome, StopReason};
