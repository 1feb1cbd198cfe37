//! Result of a regionalization run.

use std::time::Duration;

use crate::construction::Selection;
use crate::objective::{DistanceKind, ObjectiveKind, RegionStatistic};
use crate::partition::PartitionState;

/// Which driver produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    Azp,
    AzpSa,
    AzpTabu,
    AzpReactiveTabu,
    Arisel,
    MaxpTabu,
    Random,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Azp => "azp",
            Algorithm::AzpSa => "azpSa",
            Algorithm::AzpTabu => "azpTabu",
            Algorithm::AzpReactiveTabu => "azpRTabu",
            Algorithm::Arisel => "arisel",
            Algorithm::MaxpTabu => "maxpTabu",
            Algorithm::Random => "random",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Final partition and run metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionalizationResult {
    /// Objective of the reported partition.
    pub objective: f64,
    /// Objective of the constructed partition before local search.
    pub initial_objective: f64,
    /// Number of regions, isolated singletons included.
    pub regions: usize,
    /// Region id per area id.
    pub r2a: Vec<usize>,
    /// Wall-clock seconds.
    pub running_time: f64,
    pub algorithm: Algorithm,
    pub distance: DistanceKind,
    pub statistic: RegionStatistic,
    pub objective_kind: ObjectiveKind,
    pub selection: Selection,
    /// Best objective after each pass or round of the local search.
    pub cost_history: Vec<f64>,
}

impl RegionalizationResult {
    pub(crate) fn from_state(
        state: &PartitionState<'_>,
        algorithm: Algorithm,
        initial_objective: f64,
        elapsed: Duration,
        selection: Selection,
        cost_history: Vec<f64>,
    ) -> Self {
        let result = Self {
            objective: state.objective(),
            initial_objective,
            regions: state.region_count(),
            r2a: state.assignment().to_vec(),
            running_time: elapsed.as_secs_f64(),
            algorithm,
            distance: state.manager().distance_kind(),
            statistic: RegionStatistic::Centroid,
            objective_kind: state.objective_kind(),
            selection,
            cost_history,
        };
        tracing::info!(
            algorithm = algorithm.name(),
            regions = result.regions,
            initial_objective,
            objective = result.objective,
            seconds = result.running_time,
            "regionalization finished"
        );
        result
    }

    /// Member lists of every region, in region order.
    pub fn region_members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.regions];
        for (area, &region) in self.r2a.iter().enumerate() {
            members[region].push(area);
        }
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaManager;

    #[test]
    fn test_result_from_state() {
        let am = AreaManager::from_lists(
            vec![vec![1], vec![0, 2], vec![1]],
            vec![vec![0.0], vec![1.0], vec![5.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap();
        let state =
            PartitionState::from_assignment(&am, &[0, 0, 1], ObjectiveKind::SumSquares).unwrap();
        let result = RegionalizationResult::from_state(
            &state,
            Algorithm::Azp,
            1.0,
            Duration::from_millis(1500),
            Selection::Minimum,
            vec![0.5],
        );
        assert_eq!(result.regions, 2);
        assert_eq!(result.r2a, vec![0, 0, 1]);
        assert!((result.objective - 0.5).abs() < 1e-12);
        assert!((result.running_time - 1.5).abs() < 1e-9);
        assert_eq!(result.region_members(), vec![vec![0, 1], vec![2]]);
        assert_eq!(result.algorithm.to_string(), "azp");
    }
}
