//! Pheromone matrix, export records, and statistics.

use serde::{Deserialize, Serialize};

/// A dense n×n pheromone matrix with optional trail bounds.
///
/// Bounds become sticky once set: every later mutation (evaporation, deposit,
/// import) re-applies them. Without bounds, values are still kept
/// non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    data: Vec<f64>,
    size: usize,
    tau_min: Option<f64>,
    tau_max: Option<f64>,
}

impl PheromoneMatrix {
    /// Creates a matrix with every trail set to `initial`, no bounds.
    pub fn new(size: usize, initial: f64) -> Self {
        Self {
            data: vec![initial; size * size],
            size,
            tau_min: None,
            tau_max: None,
        }
    }

    /// Number of nodes covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the trail strength on the directed edge `from -> to`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the trail strength on `from -> to`, clipped to the current bounds.
    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.data[from * self.size + to] = self.clip(value);
    }

    /// Currently configured `(tau_min, tau_max)` bounds.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.tau_min, self.tau_max)
    }

    /// Installs trail bounds and re-clips every existing value.
    ///
    /// A `None` side leaves the previously configured bound (if any) in
    /// place, so bounds only ever tighten into existence, never silently
    /// disappear.
    pub fn set_bounds(&mut self, tau_min: Option<f64>, tau_max: Option<f64>) {
        if tau_min.is_some() {
            self.tau_min = tau_min;
        }
        if tau_max.is_some() {
            self.tau_max = tau_max;
        }
        let (lo, hi) = (self.tau_min, self.tau_max);
        for v in &mut self.data {
            *v = clip_with(*v, lo, hi);
        }
    }

    /// Multiplies every trail by `1 - rate`, then re-applies the floor.
    pub fn evaporate(&mut self, rate: f64) {
        let lo = self.tau_min;
        for v in &mut self.data {
            *v = clip_with(*v * (1.0 - rate), lo, None);
        }
    }

    /// Adds `amount` to the trail on `from -> to`, then re-applies the
    /// ceiling.
    pub fn deposit(&mut self, from: usize, to: usize, amount: f64) {
        let idx = from * self.size + to;
        self.data[idx] = clip_with(self.data[idx] + amount, self.tau_min, self.tau_max);
    }

    /// Summary statistics over all proper edges (ordered pairs of distinct
    /// nodes; the diagonal carries no trail).
    pub fn stats(&self) -> PheromoneStats {
        let mut sorted: Vec<f64> = Vec::with_capacity(self.size * self.size.saturating_sub(1));
        for i in 0..self.size {
            for j in 0..self.size {
                if i != j {
                    sorted.push(self.get(i, j));
                }
            }
        }
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();
        let median = if n == 0 {
            0.0
        } else if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        PheromoneStats {
            min: sorted.first().copied().unwrap_or(0.0),
            max: sorted.last().copied().unwrap_or(0.0),
            mean: if n == 0 {
                0.0
            } else {
                sorted.iter().sum::<f64>() / n as f64
            },
            median,
        }
    }

    fn clip(&self, value: f64) -> f64 {
        clip_with(value, self.tau_min, self.tau_max)
    }
}

fn clip_with(value: f64, tau_min: Option<f64>, tau_max: Option<f64>) -> f64 {
    let mut v = value.max(tau_min.unwrap_or(0.0));
    if let Some(hi) = tau_max {
        v = v.min(hi);
    }
    v
}

/// A single pheromone trail keyed by stable node identifiers.
///
/// This is the only form in which pheromone state crosses
/// [`World`](crate::world::World) instances: indices are ephemeral,
/// identifiers are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneRecord {
    /// Identifier of the edge's origin node.
    pub from_id: String,
    /// Identifier of the edge's destination node.
    pub to_id: String,
    /// Trail strength on the directed edge.
    pub pheromone: f64,
}

/// Summary statistics over a world's pheromone trails.
///
/// Diagnostic only; the optimization loop itself never reads these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PheromoneStats {
    /// Smallest trail strength.
    pub min: f64,
    /// Largest trail strength.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
}
