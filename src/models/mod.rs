//! Domain model types for time-window routing.
//!
//! Provides the core value types: service time windows, alternative nodes
//! offered to the repair strategy, and time-window violations found while
//! replaying a tour.

mod node;
mod violation;

pub use node::{AlternativeNode, TimeWindow};
pub use violation::Violation;

/// Fixed cost penalty added for each node whose service finishes after its
/// time window closes.
///
/// Lateness is a soft constraint: a tour that misses a window is still a
/// valid tour, it just carries at least this much extra cost per miss. A best
/// cost at or above this value is the signal that the search never found a
/// fully feasible tour.
pub const LATE_PENALTY: f64 = 9999.0;
