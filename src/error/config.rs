// Configuration error types and constants

use crate::error::ErrorCode;
use std::fmt;
use tracing::error;

/// Configuration error code constants
///
/// Error code range: 5001-5003
pub struct ConfigErrorCodes {}

impl ConfigErrorCodes {
    /// Config file could not be read
    pub const READ: i32 = 5001;

    /// Config file is not valid JSON for `MonitorConfig`
    pub const PARSE: i32 = 5002;

    /// Config values are out of range
    pub const INVALID: i32 = 5003;
}

/// Log a configuration error with structured context
pub fn log_config_error(err: &ConfigError, context: &str) {
    error!(
        error_code = err.code(),
        component = "MonitorConfig",
        "Config error in {}: {}",
        context,
        err.message()
    );
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Read { path: String, details: String },
    Parse { path: String, details: String },
    Invalid { field: &'static str, reason: String },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::Read { .. } => ConfigErrorCodes::READ,
            ConfigError::Parse { .. } => ConfigErrorCodes::PARSE,
            ConfigError::Invalid { .. } => ConfigErrorCodes::INVALID,
        }
    }

    fn message(&self) -> String {
        match self {
            ConfigError::Read { path, details } => {
                format!("Failed to read config {}: {}", path, details)
            }
            ConfigError::Parse { path, details } => {
                format!("Failed to parse config {}: {}", path, details)
            }
            ConfigError::Invalid { field, reason } => {
                format!("Invalid config value for {}: {}", field, reason)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ConfigError {}
