//! Substitution-and-reoptimize repair loop.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info};

use crate::colony::Ant;
use crate::evaluation::TourSimulator;
use crate::models::{AlternativeNode, LATE_PENALTY};
use crate::world::World;

/// Tunables for [`TimeWindowRepair`].
#[derive(Debug, Clone, PartialEq)]
pub struct RepairConfig {
    /// Repair rounds before giving up. Default 5.
    pub max_repair_iterations: usize,
    /// Assumed travel time to and from an alternative node, in minutes.
    /// Always explicit, never zero by omission. Default 25.0.
    pub default_travel_time: f64,
    /// Ants per iteration of the scoped colony. Default 10.
    pub local_ants: usize,
    /// Iterations of the scoped colony. Default 20.
    pub local_iterations: usize,
    /// Pheromone exponent of the scoped colony. Default 1.0.
    pub alpha: f64,
    /// Heuristic exponent of the scoped colony. Default 3.0.
    pub beta: f64,
    /// Evaporation rate of the scoped colony. Default 0.2.
    pub evaporation_rate: f64,
    /// Reinforcement scale of the scoped colony. Default 1.0.
    pub pheromone_deposit: f64,
    /// Urgency floor of the scoped colony's heuristic. Default 1e-3.
    pub min_urgency: f64,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            max_repair_iterations: 5,
            default_travel_time: 25.0,
            local_ants: 10,
            local_iterations: 20,
            alpha: 1.0,
            beta: 3.0,
            evaporation_rate: 0.2,
            pheromone_deposit: 1.0,
            min_urgency: 1e-3,
        }
    }
}

/// Repairs time-window violations in a tour by substituting alternative
/// nodes and re-optimizing the violated suffix.
///
/// Each round finds the earliest violation, picks the widest-window
/// alternative not yet tried, builds a derived world containing it, and runs
/// a small scoped colony from the violator's predecessor over the remaining
/// suffix. A feasible suffix is spliced in; otherwise the violating node is
/// dropped. After `max_repair_iterations` rounds the current tour is
/// returned if clean, the input unchanged if not — repair never fails, it
/// improves or returns what it was given.
///
/// # Examples
///
/// ```
/// use aco_tw::models::{AlternativeNode, TimeWindow};
/// use aco_tw::repair::{RepairConfig, TimeWindowRepair};
/// use aco_tw::world::World;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let world = World::new(
///     vec![vec![0.0, 30.0], vec![30.0, 0.0]],
///     vec![(480.0, 1200.0), (540.0, 1080.0)],
///     vec![0.0, 60.0],
///     480.0,
///     vec!["start".into(), "museum".into()],
/// ).unwrap();
///
/// let repair = TimeWindowRepair::new(&world, vec![], RepairConfig::default());
/// let mut rng = StdRng::seed_from_u64(0);
/// // Already feasible: returned as-is.
/// assert_eq!(repair.repair_solution(&[0, 1], &mut rng, false), vec![0, 1]);
/// ```
pub struct TimeWindowRepair<'a> {
    world: &'a World,
    alternatives: Vec<AlternativeNode>,
    config: RepairConfig,
}

impl<'a> TimeWindowRepair<'a> {
    /// Creates a repair strategy over the given world and alternative pool.
    pub fn new(world: &'a World, alternatives: Vec<AlternativeNode>, config: RepairConfig) -> Self {
        Self {
            world,
            alternatives,
            config,
        }
    }

    /// Attempts to repair the tour; see the type-level docs for the loop.
    ///
    /// The returned tour is index-valid against the world this strategy was
    /// built over, except that spliced-in alternative nodes carry indices of
    /// the derived worlds created along the way — callers wanting identifiers
    /// should rebuild a world containing the accepted alternatives.
    pub fn repair_solution<R: Rng>(&self, tour: &[usize], rng: &mut R, verbose: bool) -> Vec<usize> {
        let mut current = tour.to_vec();
        let mut current_world = self.world.clone();
        let mut used: HashSet<String> = HashSet::new();

        for round in 0..self.config.max_repair_iterations {
            let violations = TourSimulator::new(&current_world).detect_violations(&current);
            let Some(violation) = violations.first() else {
                if verbose {
                    info!(rounds = round, "repair succeeded, no violations remain");
                }
                return current;
            };

            if verbose {
                info!(
                    round = round + 1,
                    node = violation.node,
                    position = violation.position,
                    finish = violation.finish,
                    close = violation.close,
                    "repairing violation"
                );
            } else {
                debug!(round = round + 1, node = violation.node, "repairing violation");
            }

            let violated = violation.node;
            let position = violation.position;

            let Some(alt) = self.find_replacement(&current_world, violated, &used) else {
                debug!(node = violated, "no untried alternative, dropping node");
                current.retain(|&n| n != violated);
                continue;
            };

            let Ok(extended) = current_world.extended(&alt, self.config.default_travel_time)
            else {
                // Identifier collision; treat the candidate as unusable.
                used.insert(alt.id.clone());
                continue;
            };
            let alt_index = extended.n_nodes() - 1;

            let start_node = current[position - 1];
            let start_time = TourSimulator::new(&current_world).departure_after(&current[..position]);

            let mut remaining = vec![alt_index];
            remaining.extend_from_slice(&current[position + 1..]);

            match self.local_optimize(extended.clone(), start_node, &remaining, start_time, rng) {
                Some(suffix) => {
                    debug!(alt = %alt.id, "scoped colony found a feasible suffix");
                    current.truncate(position);
                    current.extend(suffix);
                    current_world = extended;
                    used.insert(alt.id.clone());
                }
                None => {
                    debug!(node = violated, "scoped colony infeasible, dropping node");
                    current.retain(|&n| n != violated);
                }
            }
        }

        // Out of rounds: keep the result only if it came out clean.
        if TourSimulator::new(&current_world)
            .detect_violations(&current)
            .is_empty()
        {
            current
        } else {
            if verbose {
                info!("repair exhausted, returning original tour");
            }
            tour.to_vec()
        }
    }

    /// Widest-window alternative strictly wider than the violated node's
    /// window, skipping candidates already tried or already in the world.
    fn find_replacement(
        &self,
        world: &World,
        violated: usize,
        used: &HashSet<String>,
    ) -> Option<AlternativeNode> {
        let violated_width = world.time_window(violated).width();
        self.alternatives
            .iter()
            .filter(|alt| !used.contains(&alt.id))
            .filter(|alt| world.index_of(&alt.id).is_none())
            .filter(|alt| alt.time_window.width() > violated_width)
            .max_by(|a, b| a.time_window.width().total_cmp(&b.time_window.width()))
            .cloned()
    }

    /// Small scoped colony over the violated suffix.
    ///
    /// Returns the re-optimized suffix (anchor excluded) when it is fully
    /// feasible, `None` when even the scoped search ends at or above
    /// [`LATE_PENALTY`].
    fn local_optimize<R: Rng>(
        &self,
        mut world: World,
        start: usize,
        candidates: &[usize],
        start_time: f64,
        rng: &mut R,
    ) -> Option<Vec<usize>> {
        if candidates.is_empty() {
            return Some(Vec::new());
        }

        let ant = Ant::new(self.config.alpha, self.config.beta, self.config.min_urgency);
        let mut best_cost = f64::INFINITY;
        let mut best_suffix: Option<Vec<usize>> = None;

        for _ in 0..self.config.local_iterations {
            let results: Vec<_> = (0..self.config.local_ants)
                .map(|_| ant.construct_from(&world, start, candidates, start_time, rng))
                .collect();

            world.evaporate(self.config.evaporation_rate);
            for result in results {
                let amount = self.config.pheromone_deposit / result.cost.max(f64::EPSILON);
                for pair in result.tour.windows(2) {
                    world.deposit(pair[0], pair[1], amount);
                }
                if result.cost < best_cost {
                    best_cost = result.cost;
                    best_suffix = Some(result.tour[1..].to_vec());
                }
            }
        }

        if best_cost >= LATE_PENALTY {
            None
        } else {
            best_suffix
        }
    }
}
