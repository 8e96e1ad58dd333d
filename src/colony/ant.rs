//! Single stochastic tour construction.

use rand::Rng;

use crate::models::LATE_PENALTY;
use crate::world::World;

/// Outcome of one ant's construction run.
#[derive(Debug, Clone, PartialEq)]
pub struct TourResult {
    /// Visited node indices in order, starting at the anchor node.
    pub tour: Vec<usize>,
    /// Travel time plus [`LATE_PENALTY`] per missed window.
    pub cost: f64,
    /// Lateness flag per tour position (the anchor is never late).
    pub late: Vec<bool>,
}

impl TourResult {
    /// Number of missed time windows along the tour.
    pub fn violation_count(&self) -> usize {
        self.late.iter().filter(|&&l| l).count()
    }
}

/// A single path-construction run over a [`World`].
///
/// At each step the ant picks the next unvisited node by roulette over
/// `pheromone^alpha * heuristic^beta`, where the heuristic favors short
/// edges toward nodes whose windows close soon. Lateness is soft: a missed
/// window adds [`LATE_PENALTY`] to the cost and construction continues.
///
/// Deterministic for a fixed random source — two ants walking the same world
/// with identically seeded generators build identical tours.
#[derive(Debug, Clone)]
pub struct Ant {
    alpha: f64,
    beta: f64,
    min_urgency: f64,
}

impl Ant {
    /// Creates an ant with the given pheromone/heuristic exponents and
    /// urgency floor.
    pub fn new(alpha: f64, beta: f64, min_urgency: f64) -> Self {
        Self {
            alpha,
            beta,
            min_urgency,
        }
    }

    /// Constructs a full tour: anchor at node 0, departure at the world's
    /// start time, all other nodes as candidates.
    pub fn construct<R: Rng>(&self, world: &World, rng: &mut R) -> TourResult {
        let candidates: Vec<usize> = (1..world.n_nodes()).collect();
        self.construct_from(world, 0, &candidates, world.start_time(), rng)
    }

    /// Constructs a scoped tour from an arbitrary anchor over an explicit
    /// candidate set, departing at `start_time`.
    ///
    /// This is the variant the repair strategy runs over a violated suffix.
    pub fn construct_from<R: Rng>(
        &self,
        world: &World,
        start: usize,
        candidates: &[usize],
        start_time: f64,
        rng: &mut R,
    ) -> TourResult {
        let mut unvisited = candidates.to_vec();
        let mut tour = Vec::with_capacity(candidates.len() + 1);
        let mut late = Vec::with_capacity(candidates.len() + 1);
        tour.push(start);
        late.push(false);

        let mut current = start;
        let mut current_time = start_time;
        let mut cost = 0.0;

        while !unvisited.is_empty() {
            let choice = self.choose_next(world, current, &unvisited, current_time, rng);
            let next = unvisited.swap_remove(choice);

            let travel = world.travel_time(current, next);
            let (finish, is_late) = world.feasible_arrival(next, current_time + travel);

            cost += travel;
            if is_late {
                cost += LATE_PENALTY;
            }
            tour.push(next);
            late.push(is_late);
            current_time = finish;
            current = next;
        }

        TourResult { tour, cost, late }
    }

    /// Roulette selection over the candidate weights; uniform fallback when
    /// the weight mass is zero or non-finite.
    fn choose_next<R: Rng>(
        &self,
        world: &World,
        current: usize,
        unvisited: &[usize],
        current_time: f64,
        rng: &mut R,
    ) -> usize {
        let weights: Vec<f64> = unvisited
            .iter()
            .map(|&next| {
                let trail = world.pheromone(current, next).powf(self.alpha);
                let desire = self.heuristic(world, current, next, current_time).powf(self.beta);
                let w = trail * desire;
                if w.is_finite() {
                    w
                } else {
                    0.0
                }
            })
            .collect();

        let total: f64 = weights.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            return rng.random_range(0..unvisited.len());
        }

        let mut remaining = rng.random_range(0.0..total);
        for (i, w) in weights.iter().enumerate() {
            remaining -= w;
            if remaining <= 0.0 {
                return i;
            }
        }
        weights.len() - 1
    }

    /// Edge attractiveness: inverse travel time scaled by how urgently the
    /// destination's window is closing.
    fn heuristic(&self, world: &World, from: usize, to: usize, current_time: f64) -> f64 {
        let travel = world.travel_time(from, to);
        let inv_travel = 1.0 / (travel + 1.0);
        inv_travel * self.urgency(world, to, current_time + travel)
    }

    /// Urgency grows as the slack before the window closes shrinks; a window
    /// already missed gets the floor value so the edge stays selectable but
    /// unattractive.
    fn urgency(&self, world: &World, node: usize, arrival: f64) -> f64 {
        let slack = world.time_window(node).close() - arrival;
        if slack <= 0.0 {
            self.min_urgency
        } else {
            (1.0 / slack).max(self.min_urgency)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_world() -> World {
        World::new(
            vec![
                vec![0.0, 30.0, 45.0, 60.0],
                vec![30.0, 0.0, 20.0, 40.0],
                vec![45.0, 20.0, 0.0, 25.0],
                vec![60.0, 40.0, 25.0, 0.0],
            ],
            vec![
                (480.0, 1200.0),
                (540.0, 1080.0),
                (600.0, 1140.0),
                (540.0, 1200.0),
            ],
            vec![0.0, 60.0, 90.0, 45.0],
            480.0,
            vec!["start".into(), "a".into(), "b".into(), "c".into()],
        )
        .expect("valid world")
    }

    #[test]
    fn test_visits_every_node_once() {
        let world = sample_world();
        let ant = Ant::new(1.0, 3.0, 1e-3);
        let mut rng = StdRng::seed_from_u64(1);
        let result = ant.construct(&world, &mut rng);

        assert_eq!(result.tour.len(), 4);
        assert_eq!(result.tour[0], 0);
        let mut seen = result.tour.clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(result.late.len(), result.tour.len());
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let world = sample_world();
        let ant = Ant::new(1.0, 3.0, 1e-3);
        let a = ant.construct(&world, &mut StdRng::seed_from_u64(42));
        let b = ant.construct(&world, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_cost_is_travel_when_feasible() {
        // Two nodes: only one possible tour, no lateness.
        let world = World::new(
            vec![vec![0.0, 30.0], vec![30.0, 0.0]],
            vec![(480.0, 1200.0), (540.0, 1080.0)],
            vec![0.0, 60.0],
            480.0,
            vec!["start".into(), "a".into()],
        )
        .expect("valid world");
        let ant = Ant::new(1.0, 3.0, 1e-3);
        let result = ant.construct(&world, &mut StdRng::seed_from_u64(0));
        assert_eq!(result.tour, vec![0, 1]);
        assert_eq!(result.cost, 30.0);
        assert_eq!(result.violation_count(), 0);
    }

    #[test]
    fn test_penalty_added_when_window_missed() {
        let world = World::new(
            vec![vec![0.0, 100.0], vec![100.0, 0.0]],
            vec![(0.0, 500.0), (0.0, 50.0)],
            vec![0.0, 10.0],
            0.0,
            vec!["start".into(), "far".into()],
        )
        .expect("valid world");
        let ant = Ant::new(1.0, 3.0, 1e-3);
        let result = ant.construct(&world, &mut StdRng::seed_from_u64(0));
        // Arrive 100, finish 110 > close 50: travel + penalty.
        assert_eq!(result.cost, 100.0 + LATE_PENALTY);
        assert_eq!(result.violation_count(), 1);
        assert!(result.late[1]);
    }

    #[test]
    fn test_scoped_construction_stays_in_candidates() {
        let world = sample_world();
        let ant = Ant::new(1.0, 3.0, 1e-3);
        let mut rng = StdRng::seed_from_u64(9);
        let result = ant.construct_from(&world, 2, &[1, 3], 700.0, &mut rng);

        assert_eq!(result.tour[0], 2);
        assert_eq!(result.tour.len(), 3);
        assert!(result.tour[1..].iter().all(|n| [1, 3].contains(n)));
    }

    #[test]
    fn test_zero_weight_falls_back_to_uniform() {
        // Zero alpha/beta exponents still give weight 1 per edge, so force
        // degenerate weights with a zero-pheromone import instead.
        let mut world = sample_world();
        let records: Vec<_> = world
            .export_pheromones()
            .into_iter()
            .map(|mut r| {
                r.pheromone = 0.0;
                r
            })
            .collect();
        world.import_pheromones(&records, None, None, 1.0);

        let ant = Ant::new(1.0, 3.0, 1e-3);
        let result = ant.construct(&world, &mut StdRng::seed_from_u64(5));
        assert_eq!(result.tour.len(), 4);
    }
}
