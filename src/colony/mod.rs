//! Ant colony construction and the iteration loop.
//!
//! - [`Ant`] — one stochastic tour construction over a world
//! - [`ColonyConfig`] — tunables with documented defaults
//! - [`AntColonySystem`] — the iteration loop: global and elitist
//!   reinforcement, evaporation, best-solution tracking, resumable sessions

mod ant;
mod config;
mod system;

pub use ant::{Ant, TourResult};
pub use config::{ColonyConfig, ConfigError};
pub use system::{AntColonySystem, BestSolution, BestSummary, PathLeg};
