//! Tour replay: timing, waiting, and violation detection.

mod simulator;

pub use simulator::{TourSimulator, Visit};
