//! AZP execution loop.
//!
//! # Algorithm
//!
//! 1. Build an initial partition with P regions
//! 2. Visit the regions in random order
//! 3. Within a region, visit its border areas in random order
//! 4. Apply the first relocation of the area that keeps the source region
//!    connected and strictly lowers the objective, then refresh the border
//!    list of the region
//! 5. Repeat passes until one of them accepts nothing
//!
//! # Reference
//!
//! Openshaw, S. (1977). "A geographical solution to scale and aggregation
//! problems in region-building, partitioning and spatial modelling",
//! *Transactions of the Institute of British Geographers* 2(4), 459-472.

use std::time::Instant;

use rand::Rng;

use super::config::AzpConfig;
use crate::area::AreaManager;
use crate::construction::{construct_exogenous, Selection};
use crate::error::Result;
use crate::partition::{PartitionState, IMPROVEMENT_EPS};
use crate::report::{Algorithm, RegionalizationResult};
use crate::rng::rng_for;

/// Outcome of [`AzpRunner::improve`].
#[derive(Debug, Clone, PartialEq)]
pub struct AzpStats {
    /// Passes executed, the final (unproductive) one included.
    pub passes: usize,
    /// Relocations applied.
    pub moves: usize,
    /// Objective at the end of each pass.
    pub cost_history: Vec<f64>,
}

/// Executes AZP.
pub struct AzpRunner;

impl AzpRunner {
    /// Constructs an initial partition and improves it.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_regionalize::area::AreaManager;
    /// use u_regionalize::azp::{AzpConfig, AzpRunner};
    /// use u_regionalize::objective::DistanceKind;
    ///
    /// // 0 - 1 - 2 - 3
    /// let am = AreaManager::from_lists(
    ///     vec![vec![1], vec![0, 2], vec![1, 3], vec![2]],
    ///     vec![vec![1.0], vec![1.1], vec![9.0], vec![9.2]],
    ///     DistanceKind::EuclideanSquared,
    /// )
    /// .unwrap();
    /// let result = AzpRunner::run(&am, &AzpConfig::new(2).with_seed(1)).unwrap();
    /// assert_eq!(result.r2a[0], result.r2a[1]);
    /// assert_eq!(result.r2a[2], result.r2a[3]);
    /// assert!(result.objective <= result.initial_objective);
    /// ```
    pub fn run(manager: &AreaManager, config: &AzpConfig) -> Result<RegionalizationResult> {
        config.validate()?;
        let started = Instant::now();
        let mut rng = rng_for(config.seed);
        tracing::info!(
            algorithm = Algorithm::Azp.name(),
            areas = manager.len(),
            regions = config.regions,
            "regionalization started"
        );

        let mut state = construct_exogenous(manager, &config.construction(), &mut rng)?;
        let initial = state.objective();
        let stats = Self::improve(&mut state, config.max_passes, &mut rng);

        Ok(RegionalizationResult::from_state(
            &state,
            Algorithm::Azp,
            initial,
            started.elapsed(),
            Selection::Minimum,
            stats.cost_history,
        ))
    }

    /// Improves `state` in place until a pass accepts no move or
    /// `max_passes` passes have run. Never increases the objective.
    pub fn improve<R: Rng>(
        state: &mut PartitionState<'_>,
        max_passes: usize,
        rng: &mut R,
    ) -> AzpStats {
        let mut passes = 0;
        let mut moves = 0;
        let mut cost_history = Vec::new();

        while passes < max_passes {
            passes += 1;
            let mut accepted = 0;
            for region in shuffled_regions(state, rng) {
                let mut pending = state.border_areas(region);
                while !pending.is_empty() {
                    let area = pending.swap_remove(rng.random_range(0..pending.len()));
                    if !can_leave(state, region, area) {
                        continue;
                    }
                    let current = state.objective();
                    let targets: Vec<usize> = state.frontier(area).iter().copied().collect();
                    let improving = targets.into_iter().find(|&to| {
                        !state.is_locked(to) && state.move_objective(area, to) < current - IMPROVEMENT_EPS
                    });
                    if let Some(to) = improving {
                        state.apply_move(area, to);
                        accepted += 1;
                        pending = state.border_areas(region);
                    }
                }
            }
            moves += accepted;
            cost_history.push(state.objective());
            tracing::debug!(pass = passes, accepted, objective = state.objective(), "azp pass");
            if accepted == 0 {
                break;
            }
        }

        AzpStats {
            passes,
            moves,
            cost_history,
        }
    }
}

/// Active region ids in random order.
pub(crate) fn shuffled_regions<R: Rng>(state: &PartitionState<'_>, rng: &mut R) -> Vec<usize> {
    use rand::seq::SliceRandom;
    let mut order: Vec<usize> = (0..state.active_regions()).collect();
    order.shuffle(rng);
    order
}

/// Whether `area` may leave `region` without emptying or splitting it.
pub(crate) fn can_leave(state: &PartitionState<'_>, region: usize, area: usize) -> bool {
    state.region_of(area) == region
        && state.region_size(region) >= 2
        && state.is_feasible_removal(region, area)
}
