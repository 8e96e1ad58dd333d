//! The colony iteration loop.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Ant, ColonyConfig, ConfigError, TourResult};
use crate::evaluation::{TourSimulator, Visit};
use crate::world::World;

/// One leg of an exported best tour, identifier-keyed so it stays meaningful
/// after the originating world is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathLeg {
    /// Identifier of the leg's origin node.
    pub from_id: String,
    /// Identifier of the leg's destination node.
    pub to_id: String,
    /// Travel time on the leg.
    pub travel_time: f64,
}

/// Portable summary of a colony's best solution.
///
/// `cost_history` is the only field guaranteed to remain meaningful across a
/// change of node set; tours are index-free here precisely so the record can
/// outlive its world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSummary {
    /// Cost of the best tour found.
    pub best_cost: f64,
    /// Best tour as stable identifiers, anchor first.
    pub best_visited_ids: Vec<String>,
    /// Best tour leg by leg.
    pub best_path: Vec<PathLeg>,
    /// Per-iteration minimum cost, append-only.
    pub cost_history: Vec<f64>,
}

/// The current best solution with full timing detail.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSolution {
    /// Cost of the tour (travel plus penalties).
    pub cost: f64,
    /// Visited node indices, anchor first.
    pub visited: Vec<usize>,
    /// Per-node timing computed by replaying the tour.
    pub visits: Vec<Visit>,
}

/// Ant colony system over one [`World`].
///
/// Runs `n_ants` independent constructions per iteration against the
/// pre-iteration pheromone snapshot, then applies all trail writes in a
/// batch: evaporation, a global deposit of `pheromone_deposit / cost` along
/// every ant's tour, and an elitist bonus of `elite_deposit / cost` along
/// the best `elite_ratio` fraction of tours. A run that never finds a
/// feasible tour is not an error — it simply ends with
/// `best_cost >= LATE_PENALTY`, which is the caller's cue to try
/// [`repair`](crate::repair).
///
/// # Examples
///
/// ```
/// use aco_tw::colony::{AntColonySystem, ColonyConfig};
/// use aco_tw::world::World;
///
/// let world = World::new(
///     vec![vec![0.0, 30.0], vec![30.0, 0.0]],
///     vec![(480.0, 1200.0), (540.0, 1080.0)],
///     vec![0.0, 60.0],
///     480.0,
///     vec!["start".into(), "museum".into()],
/// ).unwrap();
///
/// let config = ColonyConfig { n_iterations: 5, seed: Some(1), ..ColonyConfig::default() };
/// let mut colony = AntColonySystem::new(world, config).unwrap();
/// colony.optimize(false);
/// assert!(colony.best_cost() < f64::INFINITY);
/// ```
pub struct AntColonySystem {
    world: World,
    config: ColonyConfig,
    ant: Ant,
    rng: StdRng,
    best_cost: f64,
    best_tour: Vec<usize>,
    cost_history: Vec<f64>,
}

impl AntColonySystem {
    /// Creates a colony over the given world.
    ///
    /// Fails if the configuration is invalid. The random source is seeded
    /// from `config.seed`, or from the OS when unset.
    pub fn new(world: World, config: ColonyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let ant = Ant::new(config.alpha, config.beta, config.min_urgency);
        Ok(Self {
            world,
            config,
            ant,
            rng,
            best_cost: f64::INFINITY,
            best_tour: Vec::new(),
            cost_history: Vec::new(),
        })
    }

    /// Runs `n_iterations` iterations.
    pub fn optimize(&mut self, verbose: bool) {
        self.run_iterations(self.config.n_iterations, verbose);
    }

    /// Runs additional iterations without resetting pheromone or the best
    /// solution — the mechanism for incremental, cross-session learning.
    pub fn continue_optimize(&mut self, n_more_iterations: usize, verbose: bool) {
        self.run_iterations(n_more_iterations, verbose);
    }

    fn run_iterations(&mut self, n: usize, verbose: bool) {
        for _ in 0..n {
            // Read phase: every ant sees the same pre-iteration snapshot.
            let mut results: Vec<TourResult> = (0..self.config.n_ants)
                .map(|_| self.ant.construct(&self.world, &mut self.rng))
                .collect();
            results.sort_by(|a, b| a.cost.total_cmp(&b.cost));

            let min_cost = results[0].cost;
            let max_cost = results[results.len() - 1].cost;
            if min_cost < self.best_cost {
                self.best_cost = min_cost;
                self.best_tour = results[0].tour.clone();
            }

            // Write phase: evaporation, then batched deposits.
            self.world.evaporate(self.config.evaporation_rate);
            for result in &results {
                self.deposit_along(&result.tour, self.config.pheromone_deposit, result.cost);
            }
            let n_elite = (self.config.elite_ratio * self.config.n_ants as f64) as usize;
            for result in &results[..n_elite.min(results.len())] {
                self.deposit_along(&result.tour, self.config.elite_deposit, result.cost);
            }

            self.cost_history.push(min_cost);

            let iteration = self.cost_history.len();
            if verbose {
                info!(iteration, min_cost, max_cost, best = self.best_cost, "iteration");
            } else {
                debug!(iteration, min_cost, max_cost, best = self.best_cost, "iteration");
            }
        }
        if verbose {
            info!(best = self.best_cost, "optimization finished");
        }
    }

    fn deposit_along(&mut self, tour: &[usize], base: f64, cost: f64) {
        let amount = base / cost.max(f64::EPSILON);
        for pair in tour.windows(2) {
            self.world.deposit(pair[0], pair[1], amount);
        }
    }

    /// Best cost found so far, `INFINITY` before the first iteration.
    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    /// Per-iteration minimum cost, in iteration order.
    pub fn cost_history(&self) -> &[f64] {
        &self.cost_history
    }

    /// The world this colony optimizes over.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Consumes the colony, handing back its world (e.g. to export
    /// pheromones before tearing a session down).
    pub fn into_world(self) -> World {
        self.world
    }

    /// Current best solution with per-leg timing, or `None` before any tour
    /// was found.
    pub fn get_best_solution(&self) -> Option<BestSolution> {
        if self.best_tour.is_empty() {
            return None;
        }
        let (visits, _) = TourSimulator::new(&self.world).simulate(&self.best_tour);
        Some(BestSolution {
            cost: self.best_cost,
            visited: self.best_tour.clone(),
            visits,
        })
    }

    /// Exports the best solution keyed by stable identifiers.
    ///
    /// Must be called while the originating world is still alive — indices
    /// are translated to identifiers here, at the moment of export. Returns
    /// `None` before any tour was found.
    pub fn export_best(&self) -> Option<BestSummary> {
        if self.best_tour.is_empty() {
            return None;
        }
        let best_visited_ids = self
            .best_tour
            .iter()
            .map(|&idx| self.world.id_of(idx).to_string())
            .collect();
        let best_path = self
            .best_tour
            .windows(2)
            .map(|pair| PathLeg {
                from_id: self.world.id_of(pair[0]).to_string(),
                to_id: self.world.id_of(pair[1]).to_string(),
                travel_time: self.world.travel_time(pair[0], pair[1]),
            })
            .collect();
        Some(BestSummary {
            best_cost: self.best_cost,
            best_visited_ids,
            best_path,
            cost_history: self.cost_history.clone(),
        })
    }

    /// Overwrites the best-cost record and cost history from a summary.
    ///
    /// Purely informational (e.g. for display after a node-set change):
    /// tours are not rebuilt against the current world and nothing feeds
    /// back into pheromone state.
    pub fn import_best(&mut self, summary: &BestSummary) {
        self.best_cost = summary.best_cost;
        self.cost_history = summary.cost_history.clone();
    }
}
