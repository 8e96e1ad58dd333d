//! Problem space: travel times, time windows, identifier mapping, and the
//! pheromone lifecycle.
//!
//! A [`World`] is built once per optimization session. Whenever the node set
//! changes, the world is superseded by a fresh one; learned pheromone crosses
//! that boundary only as identifier-keyed [`PheromoneRecord`]s, which is what
//! makes trails survive additions, removals, and reorderings of the node set.

mod pheromone;

pub use pheromone::{PheromoneMatrix, PheromoneRecord, PheromoneStats};

use std::collections::HashMap;

use crate::distance::TravelTimeMatrix;
use crate::models::{AlternativeNode, TimeWindow};

/// Initial trail strength assigned to every edge of a fresh world.
pub const DEFAULT_PHEROMONE: f64 = 1.0;

/// Validation failure at world construction.
///
/// These are the only caller-facing faults in the crate; everything that can
/// go wrong during optimization is expressed as data (cost, violation lists).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// A collection's length disagrees with the number of node identifiers.
    #[error("{what}: expected {expected} entries, found {found}")]
    DimensionMismatch {
        /// Which collection disagreed.
        what: &'static str,
        /// Expected entry count (the identifier list length).
        expected: usize,
        /// Actual entry count.
        found: usize,
    },
    /// The travel time matrix is not square.
    #[error("travel time matrix row {row} has {found} entries, expected {expected}")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Expected row length.
        expected: usize,
        /// Actual row length.
        found: usize,
    },
    /// Two nodes share the same identifier.
    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),
    /// A time window has `open > close` or a non-finite endpoint.
    #[error("invalid time window for node {node}: ({open}, {close})")]
    InvalidTimeWindow {
        /// Node index with the bad window.
        node: usize,
        /// Window opening time as supplied.
        open: f64,
        /// Window closing time as supplied.
        close: f64,
    },
    /// A travel time is negative or non-finite.
    #[error("invalid travel time {value} from node {from} to node {to}")]
    InvalidTravelTime {
        /// Edge origin.
        from: usize,
        /// Edge destination.
        to: usize,
        /// Offending value.
        value: f64,
    },
    /// A service duration is negative or non-finite.
    #[error("invalid service time {value} at node {node}")]
    InvalidServiceTime {
        /// Node index.
        node: usize,
        /// Offending value.
        value: f64,
    },
}

/// The full problem space for one optimization session.
///
/// Owns the dense edge set (travel times and pheromone trails), the time
/// window and service duration tables, the departure time, and the bijection
/// between positional node indices and stable external identifiers. Node 0 is
/// the start node by convention; it anchors every tour and its window is
/// never checked.
///
/// Pheromone is mutated only through [`evaporate`](World::evaporate),
/// [`deposit`](World::deposit), and
/// [`import_pheromones`](World::import_pheromones) — ants and colonies read
/// trails but never write them directly.
///
/// # Examples
///
/// ```
/// use aco_tw::world::World;
///
/// let world = World::new(
///     vec![vec![0.0, 30.0], vec![30.0, 0.0]],
///     vec![(480.0, 1200.0), (540.0, 1080.0)],
///     vec![0.0, 60.0],
///     480.0,
///     vec!["start".into(), "museum".into()],
/// ).unwrap();
/// assert_eq!(world.n_nodes(), 2);
/// assert_eq!(world.index_of("museum"), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct World {
    travel: TravelTimeMatrix,
    time_windows: Vec<TimeWindow>,
    service_times: Vec<f64>,
    start_time: f64,
    node_ids: Vec<String>,
    id_to_index: HashMap<String, usize>,
    pheromone: PheromoneMatrix,
}

impl World {
    /// Builds a world from raw problem data.
    ///
    /// All four collections must agree in size with `node_ids`, the travel
    /// time matrix must be square with non-negative finite entries, windows
    /// must satisfy `open <= close`, service times must be non-negative, and
    /// identifiers must be unique. Every pheromone trail starts at
    /// [`DEFAULT_PHEROMONE`].
    pub fn new(
        travel_times: Vec<Vec<f64>>,
        time_windows: Vec<(f64, f64)>,
        service_times: Vec<f64>,
        start_time: f64,
        node_ids: Vec<String>,
    ) -> Result<Self, WorldError> {
        let n = node_ids.len();

        if travel_times.len() != n {
            return Err(WorldError::DimensionMismatch {
                what: "travel time matrix",
                expected: n,
                found: travel_times.len(),
            });
        }
        for (i, row) in travel_times.iter().enumerate() {
            if row.len() != n {
                return Err(WorldError::NotSquare {
                    row: i,
                    expected: n,
                    found: row.len(),
                });
            }
            for (j, &t) in row.iter().enumerate() {
                if !t.is_finite() || t < 0.0 {
                    return Err(WorldError::InvalidTravelTime {
                        from: i,
                        to: j,
                        value: t,
                    });
                }
            }
        }
        if time_windows.len() != n {
            return Err(WorldError::DimensionMismatch {
                what: "time window list",
                expected: n,
                found: time_windows.len(),
            });
        }
        if service_times.len() != n {
            return Err(WorldError::DimensionMismatch {
                what: "service time list",
                expected: n,
                found: service_times.len(),
            });
        }

        let mut windows = Vec::with_capacity(n);
        for (i, &(open, close)) in time_windows.iter().enumerate() {
            let tw = TimeWindow::new(open, close).ok_or(WorldError::InvalidTimeWindow {
                node: i,
                open,
                close,
            })?;
            windows.push(tw);
        }
        for (i, &s) in service_times.iter().enumerate() {
            if !s.is_finite() || s < 0.0 {
                return Err(WorldError::InvalidServiceTime { node: i, value: s });
            }
        }

        let mut id_to_index = HashMap::with_capacity(n);
        for (i, id) in node_ids.iter().enumerate() {
            if id_to_index.insert(id.clone(), i).is_some() {
                return Err(WorldError::DuplicateNodeId(id.clone()));
            }
        }

        let travel = TravelTimeMatrix::from_rows(travel_times)
            .unwrap_or_else(|| TravelTimeMatrix::new(n));

        Ok(Self {
            travel,
            time_windows: windows,
            service_times,
            start_time,
            node_ids,
            id_to_index,
            pheromone: PheromoneMatrix::new(n, DEFAULT_PHEROMONE),
        })
    }

    /// Number of nodes, including the start node.
    pub fn n_nodes(&self) -> usize {
        self.node_ids.len()
    }

    /// Departure time from the start node.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Travel time on the directed edge `from -> to`.
    pub fn travel_time(&self, from: usize, to: usize) -> f64 {
        self.travel.get(from, to)
    }

    /// Time window of the given node.
    pub fn time_window(&self, node: usize) -> &TimeWindow {
        &self.time_windows[node]
    }

    /// Service duration at the given node.
    pub fn service_time(&self, node: usize) -> f64 {
        self.service_times[node]
    }

    /// All node identifiers, in index order.
    pub fn node_ids(&self) -> &[String] {
        &self.node_ids
    }

    /// Identifier of the node at the given index.
    pub fn id_of(&self, index: usize) -> &str {
        &self.node_ids[index]
    }

    /// Index of the node with the given identifier, if present.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).copied()
    }

    /// Trail strength on the directed edge `from -> to`.
    pub fn pheromone(&self, from: usize, to: usize) -> f64 {
        self.pheromone.get(from, to)
    }

    /// Multiplies every trail by `1 - rate`, re-applying any configured
    /// floor.
    pub fn evaporate(&mut self, rate: f64) {
        self.pheromone.evaporate(rate);
    }

    /// Adds `amount` to the trail on `from -> to`, re-applying any
    /// configured ceiling.
    pub fn deposit(&mut self, from: usize, to: usize, amount: f64) {
        self.pheromone.deposit(from, to, amount);
    }

    /// Exports every trail as identifier-keyed records, one per ordered pair
    /// of distinct nodes.
    pub fn export_pheromones(&self) -> Vec<PheromoneRecord> {
        let n = self.n_nodes();
        let mut records = Vec::with_capacity(n * n.saturating_sub(1));
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    records.push(PheromoneRecord {
                        from_id: self.node_ids[i].clone(),
                        to_id: self.node_ids[j].clone(),
                        pheromone: self.pheromone.get(i, j),
                    });
                }
            }
        }
        records
    }

    /// Overwrites trails from identifier-keyed records.
    ///
    /// Each record whose both identifiers resolve in this world sets that
    /// edge's trail to `record.pheromone * scale`, clipped to the supplied
    /// bounds. Records referencing unknown identifiers are silently ignored;
    /// that is how edges of deleted nodes vanish and edges of added nodes
    /// keep their default. Duplicate records for one pair apply in order, so
    /// the last write wins. Supplied bounds stick to the world and keep
    /// applying to later evaporation and deposits.
    pub fn import_pheromones(
        &mut self,
        records: &[PheromoneRecord],
        tau_min: Option<f64>,
        tau_max: Option<f64>,
        scale: f64,
    ) {
        if tau_min.is_some() || tau_max.is_some() {
            self.pheromone.set_bounds(tau_min, tau_max);
        }
        for record in records {
            let (Some(from), Some(to)) = (
                self.index_of(&record.from_id),
                self.index_of(&record.to_id),
            ) else {
                continue;
            };
            if from != to {
                self.pheromone.set(from, to, record.pheromone * scale);
            }
        }
    }

    /// Summary statistics over all trails. Diagnostic only.
    pub fn pheromone_stats(&self) -> PheromoneStats {
        self.pheromone.stats()
    }

    /// Computes service completion at a node for a given arrival time.
    ///
    /// Returns `(finish_time, is_late)` where
    /// `finish_time = max(arrival, open) + service_time` and the arrival is
    /// late when service would finish after the window closes. Arriving
    /// early waits (for free) until the window opens.
    pub fn feasible_arrival(&self, node: usize, arrival_time: f64) -> (f64, bool) {
        let tw = &self.time_windows[node];
        let finish = arrival_time.max(tw.open()) + self.service_times[node];
        (finish, tw.is_violated(finish))
    }

    /// Returns a world enlarged by one alternative node at index
    /// `n_nodes()`.
    ///
    /// Travel time between the new node and every existing node is
    /// `default_travel` in both directions. Learned trails carry over via
    /// export/import, so all existing edges keep their strength and every
    /// edge touching the new node starts at [`DEFAULT_PHEROMONE`]; trail
    /// bounds are inherited. Fails with [`WorldError::DuplicateNodeId`] if
    /// the alternative's identifier is already present.
    pub fn extended(
        &self,
        alt: &AlternativeNode,
        default_travel: f64,
    ) -> Result<Self, WorldError> {
        let n = self.n_nodes();
        let travel = self.travel.extended(default_travel);
        let mut rows = Vec::with_capacity(n + 1);
        for i in 0..=n {
            rows.push((0..=n).map(|j| travel.get(i, j)).collect());
        }

        let mut windows: Vec<(f64, f64)> = self
            .time_windows
            .iter()
            .map(|tw| (tw.open(), tw.close()))
            .collect();
        windows.push((alt.time_window.open(), alt.time_window.close()));

        let mut services = self.service_times.clone();
        services.push(alt.service_time);

        let mut ids = self.node_ids.clone();
        ids.push(alt.id.clone());

        let mut world = Self::new(rows, windows, services, self.start_time, ids)?;
        let (tau_min, tau_max) = self.pheromone.bounds();
        world.import_pheromones(&self.export_pheromones(), tau_min, tau_max, 1.0);
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_world() -> World {
        World::new(
            vec![
                vec![0.0, 30.0, 45.0],
                vec![30.0, 0.0, 20.0],
                vec![45.0, 20.0, 0.0],
            ],
            vec![(480.0, 1200.0), (540.0, 1080.0), (600.0, 1140.0)],
            vec![0.0, 60.0, 90.0],
            480.0,
            ids(&["start", "museum", "park"]),
        )
        .expect("valid world")
    }

    #[test]
    fn test_construct() {
        let world = sample_world();
        assert_eq!(world.n_nodes(), 3);
        assert_eq!(world.start_time(), 480.0);
        assert_eq!(world.travel_time(0, 2), 45.0);
        assert_eq!(world.pheromone(0, 1), DEFAULT_PHEROMONE);
        assert_eq!(world.id_of(1), "museum");
        assert_eq!(world.index_of("park"), Some(2));
        assert_eq!(world.index_of("nowhere"), None);
    }

    #[test]
    fn test_construct_dimension_mismatch() {
        let err = World::new(
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![(0.0, 10.0)],
            vec![0.0, 0.0],
            0.0,
            ids(&["a", "b"]),
        )
        .unwrap_err();
        assert!(matches!(err, WorldError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_construct_not_square() {
        let err = World::new(
            vec![vec![0.0, 1.0], vec![1.0]],
            vec![(0.0, 10.0), (0.0, 10.0)],
            vec![0.0, 0.0],
            0.0,
            ids(&["a", "b"]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            WorldError::NotSquare {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_construct_duplicate_id() {
        let err = World::new(
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![(0.0, 10.0), (0.0, 10.0)],
            vec![0.0, 0.0],
            0.0,
            ids(&["a", "a"]),
        )
        .unwrap_err();
        assert_eq!(err, WorldError::DuplicateNodeId("a".into()));
    }

    #[test]
    fn test_construct_invalid_window() {
        let err = World::new(
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![(0.0, 10.0), (20.0, 10.0)],
            vec![0.0, 0.0],
            0.0,
            ids(&["a", "b"]),
        )
        .unwrap_err();
        assert!(matches!(err, WorldError::InvalidTimeWindow { node: 1, .. }));
    }

    #[test]
    fn test_construct_negative_travel_time() {
        let err = World::new(
            vec![vec![0.0, -1.0], vec![1.0, 0.0]],
            vec![(0.0, 10.0), (0.0, 10.0)],
            vec![0.0, 0.0],
            0.0,
            ids(&["a", "b"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WorldError::InvalidTravelTime { from: 0, to: 1, .. }
        ));
    }

    #[test]
    fn test_construct_negative_service_time() {
        let err = World::new(
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![(0.0, 10.0), (0.0, 10.0)],
            vec![0.0, -5.0],
            0.0,
            ids(&["a", "b"]),
        )
        .unwrap_err();
        assert!(matches!(err, WorldError::InvalidServiceTime { node: 1, .. }));
    }

    #[test]
    fn test_feasible_arrival_waits() {
        let world = sample_world();
        // Arrive at museum (opens 540, service 60) at 510: wait, finish 600.
        let (finish, late) = world.feasible_arrival(1, 510.0);
        assert_eq!(finish, 600.0);
        assert!(!late);
    }

    #[test]
    fn test_feasible_arrival_late() {
        let world = sample_world();
        // Museum closes 1080; arriving at 1050 finishes service at 1110.
        let (finish, late) = world.feasible_arrival(1, 1050.0);
        assert_eq!(finish, 1110.0);
        assert!(late);
    }

    #[test]
    fn test_export_covers_all_edges() {
        let world = sample_world();
        let records = world.export_pheromones();
        assert_eq!(records.len(), 6);
        assert!(records
            .iter()
            .any(|r| r.from_id == "start" && r.to_id == "park"));
        assert!(records.iter().all(|r| r.from_id != r.to_id));
    }

    #[test]
    fn test_import_roundtrip_exact() {
        let mut world = sample_world();
        world.deposit(0, 1, 0.75);
        world.evaporate(0.1);
        let records = world.export_pheromones();

        let mut fresh = sample_world();
        fresh.import_pheromones(&records, None, None, 1.0);
        for i in 0..3 {
            for j in 0..3 {
                if i != j {
                    assert_eq!(fresh.pheromone(i, j), world.pheromone(i, j));
                }
            }
        }
    }

    #[test]
    fn test_import_scale_and_bounds() {
        let mut world = sample_world();
        let records = vec![PheromoneRecord {
            from_id: "start".into(),
            to_id: "museum".into(),
            pheromone: 4.0,
        }];
        world.import_pheromones(&records, Some(0.5), Some(3.0), 2.0);
        // 4.0 * 2.0 = 8.0, clipped to tau_max 3.0.
        assert_eq!(world.pheromone(0, 1), 3.0);
        // Bounds stick: evaporating hard lands on the floor.
        world.evaporate(1.0);
        assert_eq!(world.pheromone(0, 1), 0.5);
    }

    #[test]
    fn test_import_unknown_ids_silently_dropped() {
        let mut world = sample_world();
        let records = vec![
            PheromoneRecord {
                from_id: "gone".into(),
                to_id: "museum".into(),
                pheromone: 9.0,
            },
            PheromoneRecord {
                from_id: "museum".into(),
                to_id: "park".into(),
                pheromone: 2.5,
            },
        ];
        world.import_pheromones(&records, None, None, 1.0);
        assert_eq!(world.pheromone(1, 2), 2.5);
        // Everything else untouched.
        assert_eq!(world.pheromone(0, 1), DEFAULT_PHEROMONE);
    }

    #[test]
    fn test_import_duplicate_records_last_wins() {
        let mut world = sample_world();
        let records = vec![
            PheromoneRecord {
                from_id: "start".into(),
                to_id: "museum".into(),
                pheromone: 2.0,
            },
            PheromoneRecord {
                from_id: "start".into(),
                to_id: "museum".into(),
                pheromone: 0.25,
            },
        ];
        world.import_pheromones(&records, None, None, 1.0);
        assert_eq!(world.pheromone(0, 1), 0.25);
    }

    #[test]
    fn test_deletion_transparency() {
        // Export from {start, museum, park}, import into {start, park}.
        let mut big = sample_world();
        big.deposit(0, 2, 1.5);
        let records = big.export_pheromones();

        let mut small = World::new(
            vec![vec![0.0, 45.0], vec![45.0, 0.0]],
            vec![(480.0, 1200.0), (600.0, 1140.0)],
            vec![0.0, 90.0],
            480.0,
            ids(&["start", "park"]),
        )
        .expect("valid world");
        small.import_pheromones(&records, None, None, 1.0);
        assert_eq!(small.pheromone(0, 1), big.pheromone(0, 2));
        assert_eq!(small.pheromone(1, 0), big.pheromone(2, 0));
    }

    #[test]
    fn test_addition_defaulting() {
        let mut big = sample_world();
        big.deposit(0, 1, 2.0);
        let records = big.export_pheromones();

        let mut grown = World::new(
            vec![
                vec![0.0, 30.0, 45.0, 10.0],
                vec![30.0, 0.0, 20.0, 10.0],
                vec![45.0, 20.0, 0.0, 10.0],
                vec![10.0, 10.0, 10.0, 0.0],
            ],
            vec![
                (480.0, 1200.0),
                (540.0, 1080.0),
                (600.0, 1140.0),
                (540.0, 900.0),
            ],
            vec![0.0, 60.0, 90.0, 30.0],
            480.0,
            ids(&["start", "museum", "park", "temple"]),
        )
        .expect("valid world");
        grown.import_pheromones(&records, None, None, 1.0);

        // Known edges imported, every edge touching the new node defaulted.
        assert_eq!(grown.pheromone(0, 1), big.pheromone(0, 1));
        for i in 0..3 {
            assert_eq!(grown.pheromone(i, 3), DEFAULT_PHEROMONE);
            assert_eq!(grown.pheromone(3, i), DEFAULT_PHEROMONE);
        }
    }

    #[test]
    fn test_extended_world() {
        let mut world = sample_world();
        world.deposit(1, 2, 1.0);
        let alt = AlternativeNode::new(
            "temple",
            TimeWindow::new(540.0, 840.0).expect("valid"),
            30.0,
        );
        let ext = world.extended(&alt, 25.0).expect("extended");

        assert_eq!(ext.n_nodes(), 4);
        assert_eq!(ext.index_of("temple"), Some(3));
        assert_eq!(ext.travel_time(0, 3), 25.0);
        assert_eq!(ext.travel_time(3, 1), 25.0);
        assert_eq!(ext.service_time(3), 30.0);
        assert_eq!(ext.time_window(3).close(), 840.0);
        // Learned trails carried over, new edges at default.
        assert_eq!(ext.pheromone(1, 2), world.pheromone(1, 2));
        assert_eq!(ext.pheromone(0, 3), DEFAULT_PHEROMONE);
    }

    #[test]
    fn test_extended_duplicate_id() {
        let world = sample_world();
        let alt = AlternativeNode::new(
            "museum",
            TimeWindow::new(0.0, 10.0).expect("valid"),
            0.0,
        );
        assert!(matches!(
            world.extended(&alt, 25.0),
            Err(WorldError::DuplicateNodeId(_))
        ));
    }
}
