//! Construction with a fixed number of regions.

use rand::Rng;

use super::grower::{Growth, Grower};
use super::seeds::kmeans_seeds;
use super::Selection;
use crate::area::AreaManager;
use crate::error::{RegionError, Result};
use crate::objective::ObjectiveKind;
use crate::partition::{group_labels, PartitionState};

/// Settings of the fixed-P construction.
///
/// # Examples
///
/// ```
/// use u_regionalize::construction::{ExogenousConfig, Selection};
///
/// let config = ExogenousConfig::new(4).with_selection(Selection::FullRandom);
/// assert_eq!(config.regions, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExogenousConfig {
    /// Number of regions P. Ignored when an initial solution is supplied.
    pub regions: usize,
    /// Candidate selection rule.
    pub selection: Selection,
    /// Objective the resulting partition tracks.
    pub objective: ObjectiveKind,
    /// Region label per area to replay instead of seeding.
    pub initial_solution: Option<Vec<usize>>,
}

impl Default for ExogenousConfig {
    fn default() -> Self {
        Self {
            regions: 2,
            selection: Selection::Minimum,
            objective: ObjectiveKind::SumSquares,
            initial_solution: None,
        }
    }
}

impl ExogenousConfig {
    pub fn new(regions: usize) -> Self {
        Self {
            regions,
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_objective(mut self, objective: ObjectiveKind) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_initial_solution(mut self, labels: Vec<usize>) -> Self {
        self.initial_solution = Some(labels);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_solution.is_none() && self.regions == 0 {
            return Err(RegionError::InvalidConfig(
                "the number of regions must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Rejects region counts the graph cannot support.
pub(crate) fn check_region_count(manager: &AreaManager, regions: usize) -> Result<()> {
    let n = manager.len();
    let movable = n - manager.isolated().len();
    let components = manager.connected_component_count();
    if regions == 0 || regions >= n {
        return Err(RegionError::InfeasibleRequest(format!(
            "{regions} regions for {n} areas"
        )));
    }
    if regions > movable {
        return Err(RegionError::InfeasibleRequest(format!(
            "{regions} regions but only {movable} areas have neighbors"
        )));
    }
    if components > regions {
        return Err(RegionError::InfeasibleRequest(format!(
            "the contiguity graph has {components} components but only {regions} regions were requested"
        )));
    }
    Ok(())
}

/// Builds an initial partition with a fixed number of regions.
///
/// Without an initial solution, P seeds are drawn by k-means++ and grown by
/// `config.selection` until every area is assigned. With one, the labels are
/// validated and each label's areas are regrown from its first area.
///
/// # Errors
///
/// - [`RegionError::InvalidConfig`] from [`ExogenousConfig::validate`].
/// - [`RegionError::InfeasibleRequest`] when P is 0, at least N, larger than
///   the number of non-isolated areas, or smaller than the number of graph
///   components. With an initial solution, P is its number of labels.
/// - [`RegionError::InfeasibleInitialSolution`] when the supplied labels do
///   not form a contiguous partition.
pub fn construct_exogenous<'a, R: Rng>(
    manager: &'a AreaManager,
    config: &ExogenousConfig,
    rng: &mut R,
) -> Result<PartitionState<'a>> {
    config.validate()?;
    match &config.initial_solution {
        Some(labels) => replay(manager, labels, config, rng),
        None => {
            check_region_count(manager, config.regions)?;
            let seeds = kmeans_seeds(manager, config.regions, rng);
            let mut grower = Grower::new(manager, config.selection);
            for &seed in &seeds {
                grower.found_region(seed);
            }
            while !grower.is_complete() {
                if grower.step(rng, None, |_| true) == Growth::Exhausted {
                    // unreachable once every component holds a seed
                    return Err(RegionError::InfeasibleRequest(format!(
                        "{} areas cannot be reached from any seed",
                        grower.unassigned().len()
                    )));
                }
            }
            let state = grower.into_partition(config.objective);
            tracing::debug!(
                regions = config.regions,
                objective = state.objective(),
                selection = config.selection.name(),
                "exogenous construction"
            );
            Ok(state)
        }
    }
}

fn replay<'a, R: Rng>(
    manager: &'a AreaManager,
    labels: &[usize],
    config: &ExogenousConfig,
    rng: &mut R,
) -> Result<PartitionState<'a>> {
    let groups = group_labels(manager, labels)?;
    if groups.is_empty() {
        return Err(RegionError::InfeasibleInitialSolution(
            "no area with neighbors is labelled".into(),
        ));
    }
    check_region_count(manager, groups.len())?;

    let mut allowed = vec![usize::MAX; manager.len()];
    for (region, members) in groups.iter().enumerate() {
        for &a in members {
            allowed[a] = region;
        }
    }
    let mut grower = Grower::new(manager, Selection::Minimum).with_restriction(allowed);
    for members in &groups {
        grower.found_region(members[0]);
    }
    while !grower.is_complete() {
        if grower.step(rng, None, |_| true) == Growth::Exhausted {
            return Err(RegionError::InfeasibleInitialSolution(
                "a labelled region cannot be regrown".into(),
            ));
        }
    }
    let state = grower.into_partition(config.objective);
    tracing::debug!(
        regions = groups.len(),
        objective = state.objective(),
        "replayed initial solution"
    );
    Ok(state)
}
