//! ARiSeL configuration.

use crate::construction::{ExogenousConfig, Selection};
use crate::error::{RegionError, Result};
use crate::objective::ObjectiveKind;

/// Configuration for ARiSeL: several constructions, then tabu search on the
/// best one.
///
/// # Examples
///
/// ```
/// use u_regionalize::arisel::AriselConfig;
///
/// let config = AriselConfig::new(6).with_inits(8).with_parallel(false);
/// assert_eq!(config.inits, 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AriselConfig {
    /// Number of regions P.
    pub regions: usize,
    /// Region label per area; replaces seeded construction when set.
    pub initial_solution: Option<Vec<usize>>,
    pub objective: ObjectiveKind,
    /// Number of independent constructions.
    pub inits: usize,
    /// How many reverse moves stay forbidden.
    pub tabu_length: usize,
    /// Consecutive rounds without a new best before stopping.
    /// `None` uses N / P.
    pub conv_tabu: Option<usize>,
    /// Whether to run the constructions in parallel using rayon.
    pub parallel: bool,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for AriselConfig {
    fn default() -> Self {
        Self {
            regions: 2,
            initial_solution: None,
            objective: ObjectiveKind::SumSquares,
            inits: 3,
            tabu_length: 10,
            conv_tabu: None,
            parallel: true,
            seed: None,
        }
    }
}

impl AriselConfig {
    pub fn new(regions: usize) -> Self {
        Self {
            regions,
            ..Self::default()
        }
    }

    pub fn with_initial_solution(mut self, labels: Vec<usize>) -> Self {
        self.initial_solution = Some(labels);
        self
    }

    pub fn with_objective(mut self, objective: ObjectiveKind) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the number of constructions.
    pub fn with_inits(mut self, n: usize) -> Self {
        self.inits = n;
        self
    }

    pub fn with_tabu_length(mut self, length: usize) -> Self {
        self.tabu_length = length;
        self
    }

    pub fn with_conv_tabu(mut self, rounds: usize) -> Self {
        self.conv_tabu = Some(rounds);
        self
    }

    /// Enables or disables parallel construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn construction(&self) -> ExogenousConfig {
        ExogenousConfig {
            regions: self.regions,
            selection: Selection::Minimum,
            objective: self.objective,
            initial_solution: self.initial_solution.clone(),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.inits == 0 {
            return Err(RegionError::InvalidConfig("inits must be positive".into()));
        }
        if self.conv_tabu == Some(0) {
            return Err(RegionError::InvalidConfig(
                "conv_tabu must be positive".into(),
            ));
        }
        self.construction().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AriselConfig::default();
        assert_eq!(config.inits, 3);
        assert_eq!(config.tabu_length, 10);
        assert!(config.parallel);
    }

    #[test]
    fn test_validate_zero_inits() {
        assert!(AriselConfig::new(3).with_inits(0).validate().is_err());
    }
}
