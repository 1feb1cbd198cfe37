//! Random baseline execution.

use std::time::Instant;

use super::config::RandomConfig;
use crate::area::AreaManager;
use crate::construction::{construct_exogenous, Selection};
use crate::error::Result;
use crate::report::{Algorithm, RegionalizationResult};
use crate::rng::rng_for;

/// Builds a random contiguous partition without local search.
pub struct RandomRunner;

impl RandomRunner {
    /// Grows P regions picking each candidate uniformly at random.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_regionalize::area::AreaManager;
    /// use u_regionalize::objective::DistanceKind;
    /// use u_regionalize::random::{RandomConfig, RandomRunner};
    ///
    /// let am = AreaManager::from_lists(
    ///     vec![vec![1], vec![0, 2], vec![1]],
    ///     vec![vec![1.0], vec![2.0], vec![3.0]],
    ///     DistanceKind::EuclideanSquared,
    /// )
    /// .unwrap();
    /// let result = RandomRunner::run(&am, &RandomConfig::new(2).with_seed(8)).unwrap();
    /// assert_eq!(result.regions, 2);
    /// assert_eq!(result.objective, result.initial_objective);
    /// ```
    pub fn run(manager: &AreaManager, config: &RandomConfig) -> Result<RegionalizationResult> {
        config.validate()?;
        let started = Instant::now();
        let mut rng = rng_for(config.seed);
        tracing::info!(
            algorithm = Algorithm::Random.name(),
            areas = manager.len(),
            regions = config.regions,
            "regionalization started"
        );
        let state = construct_exogenous(manager, &config.construction(), &mut rng)?;
        let objective = state.objective();
        Ok(RegionalizationResult::from_state(
            &state,
            Algorithm::Random,
            objective,
            started.elapsed(),
            Selection::FullRandom,
            vec![objective],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegionError;
    use crate::objective::DistanceKind;

    fn ring(n: usize) -> AreaManager {
        AreaManager::from_lists(
            (0..n).map(|i| vec![(i + n - 1) % n, (i + 1) % n]).collect(),
            (0..n).map(|i| vec![i as f64]).collect(),
            DistanceKind::EuclideanSquared,
        )
        .unwrap()
    }

    #[test]
    fn test_random_partition_is_feasible() {
        let am = ring(10);
        for seed in 0..10 {
            let result = RandomRunner::run(&am, &RandomConfig::new(3).with_seed(seed)).unwrap();
            assert_eq!(result.algorithm, Algorithm::Random);
            assert_eq!(result.selection, Selection::FullRandom);
            assert_eq!(result.regions, 3);
            assert!(am.check_feasibility(&result.r2a));
        }
    }

    #[test]
    fn test_same_seed_same_partition() {
        let am = ring(12);
        let a = RandomRunner::run(&am, &RandomConfig::new(4).with_seed(21)).unwrap();
        let b = RandomRunner::run(&am, &RandomConfig::new(4).with_seed(21)).unwrap();
        assert_eq!(a.r2a, b.r2a);
    }

    #[test]
    fn test_too_many_regions() {
        let am = ring(4);
        let err = RandomRunner::run(&am, &RandomConfig::new(4)).unwrap_err();
        assert!(matches!(err, RegionError::InfeasibleRequest(_)));
    }
}
