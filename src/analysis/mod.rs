// Analysis module - door state inference
//
// The classifier turns one sample at a time into at most one DoorEvent,
// updating the CalibrationState it owns.

pub mod classifier;
pub mod events;

pub use classifier::DoorClassifier;
pub use events::{DoorEvent, DoorEventKind};
