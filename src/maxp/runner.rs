//! Max-p-Tabu execution.
//!
//! # Algorithm
//!
//! 1. Grow threshold regions `maxit` times
//! 2. Keep every attempt with the largest region count (one per distinct
//!    objective)
//! 3. For each, assign the enclaves to adjacent regions and run tabu
//!    search whose moves keep both regions at or above the threshold
//! 4. Report the lowest final objective
//!
//! # Reference
//!
//! Duque, J.C., Anselin, L. & Rey, S.J. (2012). "The max-p-regions
//! problem", *Journal of Regional Science* 52(3), 397-419.

use std::time::Instant;

use super::config::{default_maxp_conv, MaxpConfig};
use crate::area::AreaManager;
use crate::construction::{absorb_enclaves, grow_threshold_regions, Selection, ThresholdAttempt};
use crate::error::{RegionError, Result};
use crate::partition::{MoveConstraint, PartitionState, IMPROVEMENT_EPS};
use crate::report::{Algorithm, RegionalizationResult};
use crate::rng::rng_for;
use crate::tabu::TabuSearch;

/// Executes Max-p-Tabu.
pub struct MaxpRunner;

impl MaxpRunner {
    /// Maximizes the number of regions meeting the threshold, then
    /// minimizes heterogeneity.
    ///
    /// # Errors
    ///
    /// - [`RegionError::MissingThreshold`] when the areas have no threshold
    ///   variable
    /// - [`RegionError::InfeasibleRequest`] when no attempt produces a
    ///   complete partition
    ///
    /// # Examples
    ///
    /// ```
    /// use u_regionalize::area::AreaManager;
    /// use u_regionalize::maxp::{MaxpConfig, MaxpRunner};
    /// use u_regionalize::objective::DistanceKind;
    ///
    /// // chain of four areas, last column is the threshold variable
    /// let am = AreaManager::from_lists_with_threshold(
    ///     vec![vec![1], vec![0, 2], vec![1, 3], vec![2]],
    ///     vec![vec![0.0, 1.0], vec![1.0, 1.0], vec![8.0, 1.0], vec![9.0, 1.0]],
    ///     DistanceKind::EuclideanSquared,
    /// )
    /// .unwrap();
    /// let result = MaxpRunner::run(&am, &MaxpConfig::new(2.0).with_seed(1)).unwrap();
    /// assert_eq!(result.regions, 2);
    /// ```
    pub fn run(manager: &AreaManager, config: &MaxpConfig) -> Result<RegionalizationResult> {
        config.validate()?;
        let started = Instant::now();
        let mut rng = rng_for(config.seed);
        tracing::info!(
            algorithm = Algorithm::MaxpTabu.name(),
            areas = manager.len(),
            threshold = config.threshold,
            maxit = config.maxit,
            "regionalization started"
        );

        let candidates = Self::best_attempts(manager, config, &mut rng)?;
        let constraint = MoveConstraint::MinThreshold(config.threshold);
        let mut best: Option<(PartitionState<'_>, f64, Vec<f64>)> = None;
        let mut failure = None;

        for attempt in &candidates {
            let mut state = match absorb_enclaves(manager, attempt, config.objective, &mut rng) {
                Ok(state) => state,
                Err(err) => {
                    tracing::debug!(error = %err, "attempt discarded");
                    failure = Some(err);
                    continue;
                }
            };
            let initial = state.objective();
            let conv_tabu = config
                .conv_tabu
                .unwrap_or_else(|| default_maxp_conv(manager.len(), state.active_regions()));
            let stats = TabuSearch::new(config.tabu_length, conv_tabu)
                .with_selection(config.selection)
                .with_constraint(constraint)
                .improve(&mut state, &mut rng);
            tracing::debug!(
                regions = state.region_count(),
                initial,
                objective = state.objective(),
                "attempt improved"
            );
            if best
                .as_ref()
                .is_none_or(|(b, _, _)| state.objective() < b.objective())
            {
                best = Some((state, initial, stats.cost_history));
            }
        }

        let Some((state, initial, cost_history)) = best else {
            return Err(failure.unwrap_or_else(|| {
                RegionError::InfeasibleRequest("no region reaches the threshold".into())
            }));
        };
        Ok(RegionalizationResult::from_state(
            &state,
            Algorithm::MaxpTabu,
            initial,
            started.elapsed(),
            Selection::Minimum,
            cost_history,
        ))
    }

    /// Attempts with the largest feasible region count, one per distinct
    /// objective, in the order they were found.
    ///
    /// # Errors
    ///
    /// [`RegionError::InfeasibleRequest`] when no attempt yields a region.
    pub fn best_attempts<R: rand::Rng>(
        manager: &AreaManager,
        config: &MaxpConfig,
        rng: &mut R,
    ) -> Result<Vec<ThresholdAttempt>> {
        let mut best_count = 0;
        let mut kept: Vec<ThresholdAttempt> = Vec::new();
        for iteration in 0..config.maxit {
            let attempt = grow_threshold_regions(manager, config.threshold, config.objective, rng)?;
            let count = attempt.region_count();
            tracing::debug!(
                iteration,
                regions = count,
                enclaves = attempt.enclaves.len(),
                objective = attempt.objective,
                "threshold attempt"
            );
            if count > best_count {
                best_count = count;
                kept.clear();
                kept.push(attempt);
            } else if count == best_count
                && count > 0
                && kept
                    .iter()
                    .all(|k| (k.objective - attempt.objective).abs() > IMPROVEMENT_EPS)
            {
                kept.push(attempt);
            }
        }
        if kept.is_empty() {
            return Err(RegionError::InfeasibleRequest(format!(
                "no region reaches threshold {}",
                config.threshold
            )));
        }
        Ok(kept)
    }
}
