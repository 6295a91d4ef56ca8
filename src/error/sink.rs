// Event sink error types and constants

use crate::error::ErrorCode;
use std::fmt;
use tracing::error;

/// Sink error code constants
///
/// Error code range: 4001-4004
pub struct SinkErrorCodes {}

impl SinkErrorCodes {
    /// Event log could not be created
    pub const LOG_OPEN: i32 = 4001;

    /// Event log record could not be written or flushed
    pub const LOG_WRITE: i32 = 4002;

    /// Notifier client could not be built
    pub const NOTIFIER_SETUP: i32 = 4003;

    /// Remote notification failed (network, auth, TLS, HTTP status)
    pub const NOTIFY_FAILED: i32 = 4004;
}

/// Log a sink error with structured context
pub fn log_sink_error(err: &SinkError, context: &str) {
    error!(
        error_code = err.code(),
        component = "EventSink",
        "Sink error in {}: {}",
        context,
        err.message()
    );
}

/// Event sink errors
///
/// `LogOpen`/`LogWrite` are fatal for a session, `NotifyFailed` never is.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkError {
    LogOpen { path: String, details: String },
    LogWrite { details: String },
    NotifierSetup { details: String },
    NotifyFailed { status: Option<u16>, details: String },
}

impl SinkError {
    /// Whether the monitor loop must stop on this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, SinkError::LogOpen { .. } | SinkError::LogWrite { .. })
    }
}

impl ErrorCode for SinkError {
    fn code(&self) -> i32 {
        match self {
            SinkError::LogOpen { .. } => SinkErrorCodes::LOG_OPEN,
            SinkError::LogWrite { .. } => SinkErrorCodes::LOG_WRITE,
            SinkError::NotifierSetup { .. } => SinkErrorCodes::NOTIFIER_SETUP,
            SinkError::NotifyFailed { .. } => SinkErrorCodes::NOTIFY_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            SinkError::LogOpen { path, details } => {
                format!("Failed to open event log {}: {}", path, details)
            }
            SinkError::LogWrite { details } => format!("Failed to write event log: {}", details),
            SinkError::NotifierSetup { details } => {
                format!("Failed to set up notifier: {}", details)
            }
            SinkError::NotifyFailed {
                status: Some(status),
                details,
            } => format!("Notification rejected with HTTP {}: {}", status, details),
            SinkError::NotifyFailed {
                status: None,
                details,
            } => format!("Notification failed: {}", details),
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SinkError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SinkError {}
