//! Cumulative-time simulation of a tour against a world.

use crate::models::Violation;
use crate::world::World;

/// Computed timing for a single node along a simulated tour.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    /// Node index being visited.
    pub node: usize,
    /// Arrival time at this node.
    pub arrival: f64,
    /// Service start time (arrival plus any waiting).
    pub service_start: f64,
    /// Departure time, `service_start + service_time`.
    pub departure: f64,
    /// Whether service finishes after the node's window closes.
    pub late: bool,
}

/// Replays a tour against a world's travel times and time windows.
///
/// The single shared timing implementation: the colony uses it to report the
/// best tour leg by leg, the repair strategy to localize violations. The
/// first tour element is the anchor — its own window is never checked.
///
/// # Examples
///
/// ```
/// use aco_tw::evaluation::TourSimulator;
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
/// let sim = TourSimulator::new(&world);
/// let (visits, violations) = sim.simulate(&[0, 1]);
/// assert_eq!(visits.len(), 1);
/// assert!(violations.is_empty());
/// ```
pub struct TourSimulator<'a> {
    world: &'a World,
}

impl<'a> TourSimulator<'a> {
    /// Creates a simulator over the given world.
    pub fn new(world: &'a World) -> Self {
        Self { world }
    }

    /// Replays the tour, returning per-node visits (first element excluded)
    /// and all time-window violations in tour order.
    pub fn simulate(&self, tour: &[usize]) -> (Vec<Visit>, Vec<Violation>) {
        let mut visits = Vec::new();
        let mut violations = Vec::new();
        let Some(&first) = tour.first() else {
            return (visits, violations);
        };

        let mut current_time = self.world.start_time();
        let mut prev = first;

        for (position, &node) in tour.iter().enumerate().skip(1) {
            let arrival = current_time + self.world.travel_time(prev, node);
            let (finish, late) = self.world.feasible_arrival(node, arrival);
            let service_start = arrival.max(self.world.time_window(node).open());

            visits.push(Visit {
                node,
                arrival,
                service_start,
                departure: finish,
                late,
            });
            if late {
                violations.push(Violation {
                    node,
                    position,
                    arrival,
                    finish,
                    close: self.world.time_window(node).close(),
                });
            }

            current_time = finish;
            prev = node;
        }

        (visits, violations)
    }

    /// Returns the tour's time-window violations, earliest first.
    pub fn detect_violations(&self, tour: &[usize]) -> Vec<Violation> {
        self.simulate(tour).1
    }

    /// Time at which the vehicle leaves the last node of the given prefix.
    ///
    /// The world's start time if the prefix holds at most the anchor.
    pub fn departure_after(&self, prefix: &[usize]) -> f64 {
        let (visits, _) = self.simulate(prefix);
        visits
            .last()
            .map(|v| v.departure)
            .unwrap_or_else(|| self.world.start_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_timing_chain_with_waiting() {
        let world = sample_world();
        let sim = TourSimulator::new(&world);
        let (visits, violations) = sim.simulate(&[0, 1, 2, 3]);

        assert!(violations.is_empty());
        // Leave at 480, arrive a at 510, wait to 540, serve 60 -> 600.
        assert_eq!(visits[0].arrival, 510.0);
        assert_eq!(visits[0].service_start, 540.0);
        assert_eq!(visits[0].departure, 600.0);
        // 600 + 20 = 620 at b (open 600), serve 90 -> 710.
        assert_eq!(visits[1].arrival, 620.0);
        assert_eq!(visits[1].service_start, 620.0);
        assert_eq!(visits[1].departure, 710.0);
        // 710 + 25 = 735 at c, serve 45 -> 780.
        assert_eq!(visits[2].departure, 780.0);
    }

    #[test]
    fn test_detects_late_finish() {
        let world = World::new(
            vec![vec![0.0, 100.0], vec![100.0, 0.0]],
            vec![(0.0, 500.0), (0.0, 120.0)],
            vec![0.0, 30.0],
            0.0,
            vec!["start".into(), "far".into()],
        )
        .expect("valid world");
        let sim = TourSimulator::new(&world);
        // Arrive at 100, finish 130 > close 120.
        let violations = sim.detect_violations(&[0, 1]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].node, 1);
        assert_eq!(violations[0].position, 1);
        assert_eq!(violations[0].finish, 130.0);
        assert!((violations[0].overshoot() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_violations_in_tour_order() {
        let world = World::new(
            vec![
                vec![0.0, 100.0, 100.0],
                vec![100.0, 0.0, 100.0],
                vec![100.0, 100.0, 0.0],
            ],
            vec![(0.0, 1000.0), (0.0, 50.0), (0.0, 50.0)],
            vec![0.0, 0.0, 0.0],
            0.0,
            vec!["s".into(), "x".into(), "y".into()],
        )
        .expect("valid world");
        let sim = TourSimulator::new(&world);
        let violations = sim.detect_violations(&[0, 1, 2]);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].position, 1);
        assert_eq!(violations[1].position, 2);
    }

    #[test]
    fn test_empty_and_anchor_only() {
        let world = sample_world();
        let sim = TourSimulator::new(&world);
        assert!(sim.detect_violations(&[]).is_empty());
        assert!(sim.detect_violations(&[0]).is_empty());
        assert_eq!(sim.departure_after(&[]), 480.0);
        assert_eq!(sim.departure_after(&[0]), 480.0);
    }

    #[test]
    fn test_departure_after_prefix() {
        let world = sample_world();
        let sim = TourSimulator::new(&world);
        assert_eq!(sim.departure_after(&[0, 1]), 600.0);
        assert_eq!(sim.departure_after(&[0, 1, 2]), 710.0);
    }
}
