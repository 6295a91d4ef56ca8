//! Configuration management for the door monitor
//!
//! Configuration is loaded from a JSON file with every section optional,
//! so a partial file only overrides what it names. CLI flags are layered on
//! top by the binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calibration::DEFAULT_SHAKE_TOLERANCE;
use crate::error::ConfigError;

/// Complete monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub sensor: SensorConfig,
    pub estimator: EstimatorConfig,
    pub timing: TimingConfig,
    pub output: OutputConfig,
    /// Hold in `AwaitingStart` until either button is pressed
    pub wait_for_start_button: bool,
}

/// Sensor link identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Controller (host adapter) address that reads from the device
    pub adapter_addr: String,
    /// Device address of the sensor board
    pub device_addr: String,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            adapter_addr: "00:00:00:00:00:00".to_string(),
            device_addr: "00:00:00:00:00:00".to_string(),
        }
    }
}

/// Door state estimator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Allowed jitter around the closed reference, in axis units
    pub shake_tolerance: f64,
    /// Emit `Cooling` events while the door stays closed
    pub report_cooling: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            shake_tolerance: DEFAULT_SHAKE_TOLERANCE,
            report_cooling: true,
        }
    }
}

/// Polling loop delays, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait after connecting (or after the start button) before the first reading
    pub settle_delay_ms: u64,
    /// Wait between two polling cycles
    pub sample_interval_ms: u64,
    /// Wait after a degenerate all-zero reading before retrying
    pub fault_cooldown_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 3_000,
            sample_interval_ms: 1_000,
            fault_cooldown_ms: 250,
        }
    }
}

impl TimingConfig {
    /// All delays zeroed, for offline replays
    pub fn immediate() -> Self {
        Self {
            settle_delay_ms: 0,
            sample_interval_ms: 0,
            fault_cooldown_ms: 0,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn fault_cooldown(&self) -> Duration {
        Duration::from_millis(self.fault_cooldown_ms)
    }
}

/// Where events go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV event log path
    pub log_path: PathBuf,
    /// Remote analytics endpoint; `None` disables remote posting
    pub remote: Option<RemoteConfig>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("fridge-livedata.csv"),
            remote: None,
        }
    }
}

/// Remote analytics endpoint and credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    /// Upper bound for a single POST
    #[serde(default = "default_remote_timeout_ms")]
    pub timeout_ms: u64,
    /// Accept self-signed certificates on the analytics host
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_remote_timeout_ms() -> u64 {
    5_000
}

impl MonitorConfig {
    /// Load and validate configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_display = path.as_ref().display().to_string();
        let contents = fs::read_to_string(&path).map_err(|err| ConfigError::Read {
            path: path_display.clone(),
            details: err.to_string(),
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|err| ConfigError::Parse {
            path: path_display.clone(),
            details: err.to_string(),
        })?;
        config.validate()?;
        tracing::info!(path = %path_display, "Loaded monitor configuration");
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.estimator.shake_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "estimator.shake_tolerance",
                reason: format!("{} is not a finite, non-negative value", tolerance),
            });
        }
        if self.output.log_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output.log_path",
                reason: "path is empty".to_string(),
            });
        }
        if let Some(remote) = &self.output.remote {
            if remote.url.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "output.remote.url",
                    reason: "url is empty".to_string(),
                });
            }
            if remote.timeout_ms == 0 {
                return Err(ConfigError::Invalid {
                    field: "output.remote.timeout_ms",
                    reason: "timeout must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}
