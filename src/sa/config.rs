//! AZP-SA configuration.

use crate::construction::{ExogenousConfig, Selection};
use crate::error::{RegionError, Result};
use crate::objective::ObjectiveKind;

/// Configuration for simulated annealing over AZP moves.
///
/// Cooling is geometric: `T_{k+1} = alpha * T_k` after every pass.
///
/// # Examples
///
/// ```
/// use u_regionalize::sa::AzpSaConfig;
///
/// let config = AzpSaConfig::new(5)
///     .with_alpha(0.9)
///     .with_initial_temperature(2.0)
///     .with_seed(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AzpSaConfig {
    /// Number of regions P.
    pub regions: usize,
    /// Region label per area; replaces seeded construction when set.
    pub initial_solution: Option<Vec<usize>>,
    pub objective: ObjectiveKind,
    /// Cooling factor in (0, 1).
    pub alpha: f64,
    /// Temperature of the first pass.
    pub initial_temperature: f64,
    /// Upper bound on passes.
    pub max_passes: usize,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for AzpSaConfig {
    fn default() -> Self {
        Self {
            regions: 2,
            initial_solution: None,
            objective: ObjectiveKind::SumSquares,
            alpha: 0.85,
            initial_temperature: 1.0,
            max_passes: 1000,
            seed: None,
        }
    }
}

impl AzpSaConfig {
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

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
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
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(RegionError::InvalidConfig(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(RegionError::InvalidConfig(
                "initial_temperature must be positive".into(),
            ));
        }
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
        let config = AzpSaConfig::default();
        assert!((config.alpha - 0.85).abs() < 1e-12);
        assert!((config.initial_temperature - 1.0).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_alpha() {
        assert!(AzpSaConfig::new(3).with_alpha(1.5).validate().is_err());
        assert!(AzpSaConfig::new(3).with_alpha(0.0).validate().is_err());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = AzpSaConfig::new(3).with_initial_temperature(-1.0);
        assert!(config.validate().is_err());
    }
}
