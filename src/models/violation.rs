//! Time-window violation record.

/// A time-window violation found while replaying a tour.
///
/// Produced by the tour simulator in tour order, so the first element is
/// always the earliest violation along the tour.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Node index (within the world the tour was simulated against).
    pub node: usize,
    /// Position of the node within the tour.
    pub position: usize,
    /// Arrival time at the node.
    pub arrival: f64,
    /// Service finish time, `max(arrival, open) + service_time`.
    pub finish: f64,
    /// Closing time of the node's window.
    pub close: f64,
}

impl Violation {
    /// How far past the window close the service would finish.
    pub fn overshoot(&self) -> f64 {
        self.finish - self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overshoot() {
        let v = Violation {
            node: 2,
            position: 3,
            arrival: 1150.0,
            finish: 1210.0,
            close: 1140.0,
        };
        assert!((v.overshoot() - 70.0).abs() < 1e-10);
    }
}
