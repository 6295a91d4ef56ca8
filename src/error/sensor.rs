// Sensor source error types and constants

use crate::error::ErrorCode;
use std::fmt;
use tracing::error;

/// Sensor error code constants
///
/// Error code range: 3001-3005
pub struct SensorErrorCodes {}

impl SensorErrorCodes {
    /// Could not connect to the sensor at startup
    pub const CONNECT_FAILED: i32 = 3001;

    /// A read from a connected sensor failed
    pub const READ_FAILED: i32 = 3002;

    /// The source delivered a reading that cannot be interpreted
    pub const INVALID_READING: i32 = 3003;

    /// A finite source has no more readings
    pub const EXHAUSTED: i32 = 3004;

    /// Read attempted before connect
    pub const NOT_CONNECTED: i32 = 3005;
}

/// Log a sensor error with structured context
pub fn log_sensor_error(err: &SensorError, context: &str) {
    error!(
        error_code = err.code(),
        component = "SampleSource",
        "Sensor error in {}: {}",
        context,
        err.message()
    );
}

/// Sensor source errors
///
/// Error code range: 3001-3005
#[derive(Debug, Clone, PartialEq)]
pub enum SensorError {
    /// Transport unavailable at startup
    ConnectFailed { details: String },

    /// Read failed on an established connection
    ReadFailed { details: String },

    /// Malformed reading (e.g. unparsable replay row)
    InvalidReading { reason: String },

    /// No more readings (end of replay data)
    Exhausted,

    /// Source was not connected
    NotConnected,
}

impl ErrorCode for SensorError {
    fn code(&self) -> i32 {
        match self {
            SensorError::ConnectFailed { .. } => SensorErrorCodes::CONNECT_FAILED,
            SensorError::ReadFailed { .. } => SensorErrorCodes::READ_FAILED,
            SensorError::InvalidReading { .. } => SensorErrorCodes::INVALID_READING,
            SensorError::Exhausted => SensorErrorCodes::EXHAUSTED,
            SensorError::NotConnected => SensorErrorCodes::NOT_CONNECTED,
        }
    }

    fn message(&self) -> String {
        match self {
            SensorError::ConnectFailed { details } => {
                format!("Failed to connect to sensor: {}", details)
            }
            SensorError::ReadFailed { details } => format!("Sensor read failed: {}", details),
            SensorError::InvalidReading { reason } => format!("Invalid reading: {}", reason),
            SensorError::Exhausted => "Sensor source exhausted".to_string(),
            SensorError::NotConnected => "Sensor not connected".to_string(),
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SensorError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SensorError {}
