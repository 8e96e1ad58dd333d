//! Colony tunables.

/// Invalid colony configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The colony needs at least one ant per iteration.
    #[error("n_ants must be at least 1")]
    NoAnts,
    /// A fraction-valued field fell outside `[0, 1]`.
    #[error("{field} must be within [0, 1], got {value}")]
    FractionOutOfRange {
        /// Offending field name.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// A weight or scale is negative or non-finite.
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidWeight {
        /// Offending field name.
        field: &'static str,
        /// Supplied value.
        value: f64,
    },
}

/// Tunables for one [`AntColonySystem`](crate::colony::AntColonySystem).
///
/// Constructed once per colony; [`Default`] gives the reference parameter
/// set.
///
/// # Examples
///
/// ```
/// use aco_tw::colony::ColonyConfig;
///
/// let config = ColonyConfig {
///     n_ants: 10,
///     n_iterations: 20,
///     seed: Some(7),
///     ..ColonyConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColonyConfig {
    /// Ants constructed per iteration. Default 20.
    pub n_ants: usize,
    /// Iterations run by `optimize`. Default 50.
    pub n_iterations: usize,
    /// Pheromone exponent. Default 1.0.
    pub alpha: f64,
    /// Heuristic exponent. Default 3.0.
    pub beta: f64,
    /// Fraction of every trail removed per iteration, in `[0, 1]`.
    /// Default 0.2.
    pub evaporation_rate: f64,
    /// Base reinforcement scale; each ant deposits this divided by its tour
    /// cost. Default 1.0.
    pub pheromone_deposit: f64,
    /// Fraction of best ants receiving the elitist bonus, in `[0, 1]`.
    /// Default 0.3.
    pub elite_ratio: f64,
    /// Bonus reinforcement scale for elite ants, also divided by tour cost.
    /// Default 1.0.
    pub elite_deposit: f64,
    /// Floor for the time-window urgency term of the heuristic, and the
    /// urgency assigned to already-missed windows. Default 1e-3.
    pub min_urgency: f64,
    /// Seed for the colony's random source. `None` seeds from the OS; a
    /// fixed seed reproduces a run exactly. Default `None`.
    pub seed: Option<u64>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            n_ants: 20,
            n_iterations: 50,
            alpha: 1.0,
            beta: 3.0,
            evaporation_rate: 0.2,
            pheromone_deposit: 1.0,
            elite_ratio: 0.3,
            elite_deposit: 1.0,
            min_urgency: 1e-3,
            seed: None,
        }
    }
}

impl ColonyConfig {
    /// Checks every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_ants == 0 {
            return Err(ConfigError::NoAnts);
        }
        for (field, value) in [
            ("evaporation_rate", self.evaporation_rate),
            ("elite_ratio", self.elite_ratio),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FractionOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("pheromone_deposit", self.pheromone_deposit),
            ("elite_deposit", self.elite_deposit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { field, value });
            }
        }
        if !self.min_urgency.is_finite() || self.min_urgency <= 0.0 {
            return Err(ConfigError::InvalidWeight {
                field: "min_urgency",
                value: self.min_urgency,
            });
        }
        Ok(())
    }
}
