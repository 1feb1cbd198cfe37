//! Random baseline configuration.

use crate::construction::{ExogenousConfig, Selection};
use crate::error::Result;
use crate::objective::ObjectiveKind;

/// Configuration for the random-construction baseline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomConfig {
    /// Number of regions P.
    pub regions: usize,
    pub objective: ObjectiveKind,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            regions: 2,
            objective: ObjectiveKind::SumSquares,
            seed: None,
        }
    }
}

impl RandomConfig {
    pub fn new(regions: usize) -> Self {
        Self {
            regions,
            ..Self::default()
        }
    }

    pub fn with_objective(mut self, objective: ObjectiveKind) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn construction(&self) -> ExogenousConfig {
        ExogenousConfig {
            regions: self.regions,
            selection: Selection::FullRandom,
            objective: self.objective,
            initial_solution: None,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.construction().validate()
    }
}
