// Calibration module - self-calibrating closed-door baseline
//
// CalibrationState holds the closed-door axis reference, the previous
// temperature and the current door belief. The classifier in
// `crate::analysis` reads and updates it once per sample.

pub mod state;

pub use state::{CalibrationState, ToleranceBand, DEFAULT_SHAKE_TOLERANCE};
