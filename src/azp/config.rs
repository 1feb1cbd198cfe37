//! AZP configuration.

use crate::construction::{ExogenousConfig, Selection};
use crate::error::{RegionError, Result};
use crate::objective::ObjectiveKind;

/// Configuration for the steepest-descent AZP.
///
/// # Examples
///
/// ```
/// use u_regionalize::azp::AzpConfig;
///
/// let config = AzpConfig::new(4).with_max_passes(50).with_seed(7);
/// assert_eq!(config.regions, 4);
/// assert_eq!(config.max_passes, 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AzpConfig {
    /// Number of regions P.
    pub regions: usize,
    /// Region label per area; replaces seeded construction when set.
    pub initial_solution: Option<Vec<usize>>,
    pub objective: ObjectiveKind,
    /// Upper bound on improvement passes.
    pub max_passes: usize,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for AzpConfig {
    fn default() -> Self {
        Self {
            regions: 2,
            initial_solution: None,
            objective: ObjectiveKind::SumSquares,
            max_passes: 1000,
            seed: None,
        }
    }
}

impl AzpConfig {
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

    pub fn with_max_passes(mut self, n: usize) -> Self {
        self.max_passes = n;
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
        if self.max_passes == 0 {
            return Err(RegionError::InvalidConfig(
                "max_passes must be positive".into(),
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
        let config = AzpConfig::default();
        assert_eq!(config.regions, 2);
        assert_eq!(config.max_passes, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(AzpConfig::new(0).validate().is_err());
        assert!(AzpConfig::new(3).with_max_passes(0).validate().is_err());
        // the initial solution fixes P
        assert!(AzpConfig::new(0)
            .with_initial_solution(vec![0, 0, 1])
            .validate()
            .is_ok());
    }
}
