//! # aco-tw
//!
//! Ant colony optimization for single-vehicle routing with soft time windows.
//! Pheromone trails are keyed on stable node identifiers so learned state
//! survives additions, removals, and reorderings of the node set across
//! independent optimization sessions, and a bounded repair procedure handles
//! instances where no fully feasible tour exists.
//!
//! ## Modules
//!
//! - [`models`] — Time windows, alternative nodes, violations, the lateness penalty
//! - [`distance`] — Dense travel time matrix
//! - [`world`] — Problem space: pheromone lifecycle, identifier mapping, import/export
//! - [`evaluation`] — Cumulative-time tour replay and violation detection
//! - [`colony`] — Ant construction and the colony iteration loop
//! - [`repair`] — Violation repair via substitution and scoped re-optimization

pub mod colony;
pub mod distance;
pub mod evaluation;
pub mod models;
pub mod repair;
pub mod world;
