// Error types for the fridge door monitor
//
// This module defines error families for the sensor source, the event sinks
// and configuration loading, each carrying a stable numeric code so that
// CLI exit paths and log lines can be matched programmatically.

mod config;
mod sensor;
mod sink;

use std::fmt;

pub use config::{log_config_error, ConfigError, ConfigErrorCodes};
pub use sensor::{log_sensor_error, SensorError, SensorErrorCodes};
pub use sink::{log_sink_error, SinkError, SinkErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent handling in the monitor
/// loop and the CLI.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Fatal errors that end a monitoring session.
///
/// Only failures without a recovery path surface here: the sensor cannot be
/// reached, or the event log (the system of record) cannot be written.
/// Notifier failures never become a `MonitorError`.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorError {
    Sensor(SensorError),
    Sink(SinkError),
}

impl ErrorCode for MonitorError {
    fn code(&self) -> i32 {
        match self {
            MonitorError::Sensor(err) => err.code(),
            MonitorError::Sink(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            MonitorError::Sensor(err) => err.message(),
            MonitorError::Sink(err) => err.message(),
        }
    }
}

impl From<SensorError> for MonitorError {
    fn from(err: SensorError) -> Self {
        MonitorError::Sensor(err)
    }
}

impl From<SinkError> for MonitorError {
    fn from(err: SinkError) -> Self {
        MonitorError::Sink(err)
    }
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Sensor(err) => write!(f, "{}", err),
            MonitorError::Sink(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Sensor(err) => Some(err),
            MonitorError::Sink(err) => Some(err),
        }
    }
}
