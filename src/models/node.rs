//! Time window and alternative node types.

/// An allowed service interval for a node, in minutes since a reference
/// origin (e.g. midnight).
///
/// A vehicle may arrive before `open` — it then waits, which costs no
/// penalty but advances the clock — and must finish service no later than
/// `close`.
///
/// # Examples
///
/// ```
/// use aco_tw::models::TimeWindow;
///
/// let tw = TimeWindow::new(540.0, 1080.0).unwrap();
/// assert!(tw.open() <= tw.close());
/// assert!(tw.contains(600.0));
/// assert!(!tw.contains(1100.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    open: f64,
    close: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `open > close` or either value is non-finite.
    pub fn new(open: f64, close: f64) -> Option<Self> {
        if !open.is_finite() || !close.is_finite() || open > close {
            return None;
        }
        Some(Self { open, close })
    }

    /// Opening time of the window.
    pub fn open(&self) -> f64 {
        self.open
    }

    /// Closing time of the window.
    pub fn close(&self) -> f64 {
        self.close
    }

    /// Window width, `close - open`.
    ///
    /// The repair strategy prefers replacement nodes with wider windows.
    pub fn width(&self) -> f64 {
        self.close - self.open
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.open && time <= self.close
    }

    /// Returns the waiting time if arriving at the given time.
    ///
    /// Zero if the vehicle arrives at or after `open`.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        if arrival < self.open {
            self.open - arrival
        } else {
            0.0
        }
    }

    /// Returns `true` if service finishing at the given time misses this
    /// window.
    pub fn is_violated(&self, finish: f64) -> bool {
        finish > self.close
    }
}

/// A candidate node the repair strategy may substitute for a node whose
/// time window cannot be met.
///
/// Alternative nodes are not part of the [`World`](crate::world::World) they
/// repair; their identifier must not collide with any identifier already in
/// the node set. Travel time to and from an alternative node is an explicit
/// configuration value of the repair strategy, never assumed.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeNode {
    /// Stable external identifier of the candidate.
    pub id: String,
    /// Allowed service interval at the candidate.
    pub time_window: TimeWindow,
    /// Service duration at the candidate, in minutes.
    pub service_time: f64,
}

impl AlternativeNode {
    /// Creates a new alternative node.
    pub fn new(id: impl Into<String>, time_window: TimeWindow, service_time: f64) -> Self {
        Self {
            id: id.into(),
            time_window,
            service_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(540.0, 1080.0).expect("valid");
        assert_eq!(tw.open(), 540.0);
        assert_eq!(tw.close(), 1080.0);
        assert_eq!(tw.width(), 540.0);
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(1080.0, 540.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 540.0).is_none());
        assert!(TimeWindow::new(540.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_time_window_contains() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!(tw.contains(10.0));
        assert!(tw.contains(15.0));
        assert!(tw.contains(20.0));
        assert!(!tw.contains(9.9));
        assert!(!tw.contains(20.1));
    }

    #[test]
    fn test_time_window_waiting() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!((tw.waiting_time(5.0) - 5.0).abs() < 1e-10);
        assert!(tw.waiting_time(10.0).abs() < 1e-10);
        assert!(tw.waiting_time(15.0).abs() < 1e-10);
    }

    #[test]
    fn test_time_window_violated() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!(!tw.is_violated(20.0));
        assert!(tw.is_violated(20.1));
    }

    #[test]
    fn test_zero_width_window() {
        let tw = TimeWindow::new(60.0, 60.0).expect("valid");
        assert_eq!(tw.width(), 0.0);
        assert!(tw.contains(60.0));
    }

    #[test]
    fn test_alternative_node() {
        let tw = TimeWindow::new(540.0, 840.0).expect("valid");
        let alt = AlternativeNode::new("temple", tw, 30.0);
        assert_eq!(alt.id, "temple");
        assert_eq!(alt.time_window.width(), 300.0);
        assert_eq!(alt.service_time, 30.0);
    }
}
