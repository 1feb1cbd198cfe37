//! Tabu search configuration.

use crate::construction::{ExogenousConfig, Selection};
use crate::error::{RegionError, Result};
use crate::objective::ObjectiveKind;

/// How each tabu round picks its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TabuSelection {
    /// Enumerate every feasible move and take the best admissible one.
    #[default]
    Exact,
    /// Draw catalogue entries at random and take the first admissible one.
    Random,
}

/// Configuration for AZP-Tabu.
///
/// # Examples
///
/// ```
/// use u_regionalize::tabu::{TabuConfig, TabuSelection};
///
/// let config = TabuConfig::new(4)
///     .with_tabu_length(7)
///     .with_conv_tabu(25)
///     .with_selection(TabuSelection::Random);
/// assert_eq!(config.tabu_length, 7);
/// assert_eq!(config.conv_tabu, Some(25));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuConfig {
    /// Number of regions P.
    pub regions: usize,
    /// Region label per area; replaces seeded construction when set.
    pub initial_solution: Option<Vec<usize>>,
    pub objective: ObjectiveKind,
    /// How many reverse moves stay forbidden.
    pub tabu_length: usize,
    /// Consecutive rounds without a new best before stopping.
    /// `None` uses N / P.
    pub conv_tabu: Option<usize>,
    pub selection: TabuSelection,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            regions: 2,
            initial_solution: None,
            objective: ObjectiveKind::SumSquares,
            tabu_length: 10,
            conv_tabu: None,
            selection: TabuSelection::Exact,
            seed: None,
        }
    }
}

impl TabuConfig {
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

    /// Sets the tabu list length.
    pub fn with_tabu_length(mut self, length: usize) -> Self {
        self.tabu_length = length;
        self
    }

    /// Sets the number of non-improving rounds tolerated.
    pub fn with_conv_tabu(mut self, rounds: usize) -> Self {
        self.conv_tabu = Some(rounds);
        self
    }

    pub fn with_selection(mut self, selection: TabuSelection) -> Self {
        self.selection = selection;
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
        validate_conv_tabu(self.conv_tabu)?;
        self.construction().validate()
    }
}

/// Configuration for reactive tabu search.
///
/// The tabu length adapts during the search, starting at 1.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactiveTabuConfig {
    /// Number of regions P.
    pub regions: usize,
    /// Region label per area; replaces seeded construction when set.
    pub initial_solution: Option<Vec<usize>>,
    pub objective: ObjectiveKind,
    /// Consecutive rounds without a new best before stopping.
    /// `None` uses N / P.
    pub conv_tabu: Option<usize>,
    /// Visits after which a partition counts as often repeated (K1).
    pub repetition_limit: usize,
    /// Often repeated partitions tolerated before a kick (K2).
    pub chaos_limit: usize,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for ReactiveTabuConfig {
    fn default() -> Self {
        Self {
            regions: 2,
            initial_solution: None,
            objective: ObjectiveKind::SumSquares,
            conv_tabu: None,
            repetition_limit: 3,
            chaos_limit: 3,
            seed: None,
        }
    }
}

impl ReactiveTabuConfig {
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

    pub fn with_conv_tabu(mut self, rounds: usize) -> Self {
        self.conv_tabu = Some(rounds);
        self
    }

    pub fn with_repetition_limit(mut self, k1: usize) -> Self {
        self.repetition_limit = k1;
        self
    }

    pub fn with_chaos_limit(mut self, k2: usize) -> Self {
        self.chaos_limit = k2;
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
        validate_conv_tabu(self.conv_tabu)?;
        if self.repetition_limit == 0 || self.chaos_limit == 0 {
            return Err(RegionError::InvalidConfig(
                "repetition and chaos limits must be positive".into(),
            ));
        }
        self.construction().validate()
    }
}

fn validate_conv_tabu(conv_tabu: Option<usize>) -> Result<()> {
    if conv_tabu == Some(0) {
        return Err(RegionError::InvalidConfig(
            "conv_tabu must be positive".into(),
        ));
    }
    Ok(())
}

/// Default convergence budget: areas per region, at least one.
pub(crate) fn default_conv_tabu(areas: usize, regions: usize) -> usize {
    (areas / regions.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TabuConfig::default();
        assert_eq!(config.tabu_length, 10);
        assert_eq!(config.selection, TabuSelection::Exact);
        assert!(config.conv_tabu.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_conv() {
        assert!(TabuConfig::new(3).with_conv_tabu(0).validate().is_err());
        assert!(ReactiveTabuConfig::new(3).with_conv_tabu(0).validate().is_err());
        assert!(ReactiveTabuConfig::new(3)
            .with_repetition_limit(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_default_conv_tabu() {
        assert_eq!(default_conv_tabu(100, 4), 25);
        assert_eq!(default_conv_tabu(3, 5), 1);
    }
}
