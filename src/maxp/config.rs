//! Max-p configuration.

use crate::error::{RegionError, Result};
use crate::objective::ObjectiveKind;
use crate::tabu::TabuSelection;

/// Configuration for Max-p-Tabu.
///
/// # Examples
///
/// ```
/// use u_regionalize::maxp::MaxpConfig;
///
/// let config = MaxpConfig::new(120.0).with_maxit(10).with_seed(3);
/// assert_eq!(config.maxit, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxpConfig {
    /// Minimum threshold total per region.
    pub threshold: f64,
    /// Number of randomized construction attempts.
    pub maxit: usize,
    /// How many reverse moves stay forbidden.
    pub tabu_length: usize,
    pub selection: TabuSelection,
    /// Consecutive rounds without a new best before stopping.
    /// `None` uses max(10, N / P).
    pub conv_tabu: Option<usize>,
    pub objective: ObjectiveKind,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for MaxpConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            maxit: 2,
            tabu_length: 5,
            selection: TabuSelection::Exact,
            conv_tabu: None,
            objective: ObjectiveKind::SumSquares,
            seed: None,
        }
    }
}

impl MaxpConfig {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Sets the number of construction attempts.
    pub fn with_maxit(mut self, maxit: usize) -> Self {
        self.maxit = maxit;
        self
    }

    pub fn with_tabu_length(mut self, length: usize) -> Self {
        self.tabu_length = length;
        self
    }

    pub fn with_selection(mut self, selection: TabuSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_conv_tabu(mut self, rounds: usize) -> Self {
        self.conv_tabu = Some(rounds);
        self
    }

    pub fn with_objective(mut self, objective: ObjectiveKind) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(RegionError::InvalidConfig(format!(
                "threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        if self.maxit == 0 {
            return Err(RegionError::InvalidConfig("maxit must be positive".into()));
        }
        if self.conv_tabu == Some(0) {
            return Err(RegionError::InvalidConfig(
                "conv_tabu must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Default convergence budget for max-p: areas per region, at least ten.
pub(crate) fn default_maxp_conv(areas: usize, regions: usize) -> usize {
    (areas / regions.max(1)).max(10)
}
