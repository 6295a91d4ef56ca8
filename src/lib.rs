// Fridge Door Monitor Core
// Door state inference from magnetometer drift and temperature trend

// Module declarations
pub mod analysis;
pub mod calibration;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod sensor;
pub mod sinks;

// Re-exports for convenience
pub use analysis::{DoorClassifier, DoorEvent, DoorEventKind};
pub use calibration::{CalibrationState, ToleranceBand};
pub use config::MonitorConfig;
pub use context::MonitorContext;
pub use engine::{LoopPhase, MonitorEngine, SessionSummary, StopReason};
pub use error::{MonitorError, SensorError, SinkError};
pub use sensor::{RawReading, Sample, SampleSource};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides `default_directive` (e.g. `"info"`). Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_logging(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
