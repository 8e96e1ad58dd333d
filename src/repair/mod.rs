//! Time-window violation repair.
//!
//! When the colony's best tour still misses windows (a genuinely
//! over-constrained instance), the repair strategy localizes the first
//! violation, substitutes an alternative node or drops the violator, and
//! re-optimizes only the affected suffix with a small scoped colony —
//! preserving the proven-feasible prefix and falling back to the original
//! tour when nothing helps.

mod strategy;

pub use strategy::{RepairConfig, TimeWindowRepair};
