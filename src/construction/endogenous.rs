//! Constructions where the number of regions follows from a threshold.

use rand::Rng;

use super::grower::{Growth, Grower};
use super::Selection;
use crate::area::AreaManager;
use crate::error::{RegionError, Result};
use crate::objective::ObjectiveKind;
use crate::partition::PartitionState;

/// One randomized pass of threshold growing.
///
/// `regions` holds only the regions whose threshold total reached the
/// threshold; `enclaves` are the areas left outside of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdAttempt {
    pub regions: Vec<Vec<usize>>,
    pub enclaves: Vec<usize>,
    /// Objective over the feasible regions.
    pub objective: f64,
}

impl ThresholdAttempt {
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

fn require_threshold(manager: &AreaManager, threshold: f64) -> Result<()> {
    if !manager.has_threshold() {
        return Err(RegionError::MissingThreshold);
    }
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(RegionError::InvalidConfig(format!(
            "threshold must be finite and non-negative, got {threshold}"
        )));
    }
    Ok(())
}

fn random_unassigned<R: Rng>(grower: &Grower<'_>, rng: &mut R) -> Option<usize> {
    let free = grower.unassigned();
    if free.is_empty() {
        return None;
    }
    free.iter().nth(rng.random_range(0..free.len())).copied()
}

/// Grows regions until each reaches `threshold` on the threshold variable.
///
/// Areas that meet the threshold on their own become singleton regions
/// first. Then a random unassigned area seeds a region that absorbs its
/// nearest-centroid neighbors until the total reaches the threshold, and
/// the region is frozen. When a region runs out of candidates first
/// ([`Growth::Exhausted`]) it is abandoned and its areas become enclaves.
///
/// # Errors
///
/// [`RegionError::MissingThreshold`] when the areas carry no threshold
/// variable, [`RegionError::InvalidConfig`] for a negative or non-finite
/// threshold.
pub fn grow_threshold_regions<R: Rng>(
    manager: &AreaManager,
    threshold: f64,
    kind: ObjectiveKind,
    rng: &mut R,
) -> Result<ThresholdAttempt> {
    require_threshold(manager, threshold)?;
    let mut grower = Grower::new(manager, Selection::Minimum);
    let mut feasible = Vec::new();
    let mut enclaves = Vec::new();

    let heavy: Vec<usize> = grower
        .unassigned()
        .iter()
        .copied()
        .filter(|&a| manager.threshold_value(a) >= threshold)
        .collect();
    for area in heavy {
        let region = grower.found_region(area);
        grower.freeze(region);
        feasible.push(region);
    }

    while let Some(seed) = random_unassigned(&grower, rng) {
        let region = grower.found_region(seed);
        let mut total = manager.threshold_value(seed);
        while total < threshold {
            match grower.step(rng, Some(region), |_| true) {
                Growth::Assigned { area, .. } => total += manager.threshold_value(area),
                Growth::Exhausted => break,
            }
        }
        grower.freeze(region);
        if total >= threshold {
            feasible.push(region);
        } else {
            tracing::warn!(
                region,
                size = grower.members(region).len(),
                total,
                "region abandoned below threshold"
            );
            enclaves.extend_from_slice(grower.members(region));
        }
    }

    let regions: Vec<Vec<usize>> = feasible
        .iter()
        .map(|&r| grower.members(r).to_vec())
        .collect();
    let objective = kind.total(manager, &regions);
    enclaves.sort_unstable();
    Ok(ThresholdAttempt {
        regions,
        enclaves,
        objective,
    })
}

/// Completes an attempt by assigning every enclave to an adjacent feasible
/// region, closest centroid first. No region is created.
///
/// # Errors
///
/// [`RegionError::InfeasibleRequest`] when the attempt has no feasible
/// region or some enclaves cannot reach one through other enclaves.
pub fn absorb_enclaves<'a, R: Rng>(
    manager: &'a AreaManager,
    attempt: &ThresholdAttempt,
    kind: ObjectiveKind,
    rng: &mut R,
) -> Result<PartitionState<'a>> {
    if attempt.regions.is_empty() {
        return Err(RegionError::InfeasibleRequest(
            "no region reaches the threshold".into(),
        ));
    }
    let mut grower = Grower::from_regions(manager, Selection::Minimum, attempt.regions.clone());
    while !grower.is_complete() {
        if grower.step(rng, None, |_| true) == Growth::Exhausted {
            return Err(RegionError::InfeasibleRequest(format!(
                "{} enclave areas are not connected to any feasible region",
                grower.unassigned().len()
            )));
        }
    }
    Ok(grower.into_partition(kind))
}

/// Grows regions whose threshold values span at most `threshold`
/// (max minus min).
///
/// Each round seeds a region on a random unassigned area and grows it while
/// an adjacent candidate keeps the span within the threshold. Every region
/// is accepted. After `max_rounds` rounds the remaining areas become
/// singleton regions.
///
/// # Errors
///
/// As [`grow_threshold_regions`], plus [`RegionError::InvalidConfig`] when
/// `max_rounds` is zero.
pub fn construct_range<'a, R: Rng>(
    manager: &'a AreaManager,
    threshold: f64,
    max_rounds: usize,
    kind: ObjectiveKind,
    rng: &mut R,
) -> Result<PartitionState<'a>> {
    require_threshold(manager, threshold)?;
    if max_rounds == 0 {
        return Err(RegionError::InvalidConfig(
            "max_rounds must be positive".into(),
        ));
    }
    let mut grower = Grower::new(manager, Selection::Minimum);
    let mut rounds = 0;
    while rounds < max_rounds {
        let Some(seed) = random_unassigned(&grower, rng) else {
            break;
        };
        rounds += 1;
        let region = grower.found_region(seed);
        let mut low = manager.threshold_value(seed);
        let mut high = low;
        loop {
            let within = |a: usize| {
                let t = manager.threshold_value(a);
                high.max(t) - low.min(t) <= threshold
            };
            match grower.step(rng, Some(region), within) {
                Growth::Assigned { area, .. } => {
                    let t = manager.threshold_value(area);
                    low = low.min(t);
                    high = high.max(t);
                }
                Growth::Exhausted => break,
            }
        }
        grower.freeze(region);
    }

    let leftovers: Vec<usize> = grower.unassigned().iter().copied().collect();
    if !leftovers.is_empty() {
        tracing::warn!(
            rounds,
            count = leftovers.len(),
            "round cap reached, remaining areas become singleton regions"
        );
        for area in leftovers {
            let region = grower.found_region(area);
            grower.freeze(region);
        }
    }
    let state = grower.into_partition(kind);
    tracing::debug!(
        regions = state.region_count(),
        objective = state.objective(),
        "range construction"
    );
    Ok(state)
}
