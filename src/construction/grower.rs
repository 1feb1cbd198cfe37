//! Incremental region growing over a candidate pool.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use super::Selection;
use crate::area::AreaManager;
use crate::objective::ObjectiveKind;
use crate::partition::PartitionState;

/// Outcome of one growth step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// `area` joined `region`.
    Assigned { area: usize, region: usize },
    /// No admissible candidate is left for the requested region(s).
    Exhausted,
}

/// Partial assignment under construction.
///
/// Keeps the candidate pool `(area, region) → distance` for every
/// unassigned area adjacent to a growing region. Frozen regions no longer
/// receive candidates. An optional restriction pins each area to the only
/// region it may join.
#[derive(Debug, Clone)]
pub(crate) struct Grower<'a> {
    manager: &'a AreaManager,
    selection: Selection,
    area2region: Vec<Option<usize>>,
    regions: Vec<Vec<usize>>,
    frozen: Vec<bool>,
    unassigned: BTreeSet<usize>,
    candidates: BTreeMap<(usize, usize), f64>,
    restriction: Option<Vec<usize>>,
}

impl<'a> Grower<'a> {
    /// Every non-isolated area starts unassigned.
    pub fn new(manager: &'a AreaManager, selection: Selection) -> Self {
        Self {
            manager,
            selection,
            area2region: vec![None; manager.len()],
            regions: Vec::new(),
            frozen: Vec::new(),
            unassigned: (0..manager.len())
                .filter(|&a| !manager.is_isolated(a))
                .collect(),
            candidates: BTreeMap::new(),
            restriction: None,
        }
    }

    /// Starts from complete regions; areas not listed stay unassigned and
    /// become candidates of the regions they touch.
    pub fn from_regions(
        manager: &'a AreaManager,
        selection: Selection,
        regions: Vec<Vec<usize>>,
    ) -> Self {
        let mut grower = Self::new(manager, selection);
        for members in regions {
            let Some((&seed, rest)) = members.split_first() else {
                continue;
            };
            let region = grower.found_region(seed);
            for &area in rest {
                grower.assign(area, region);
            }
        }
        grower
    }

    /// Pins every area to `allowed[area]`, the only region it may join.
    pub fn with_restriction(mut self, allowed: Vec<usize>) -> Self {
        self.restriction = Some(allowed);
        self
    }

    pub fn members(&self, region: usize) -> &[usize] {
        &self.regions[region]
    }

    pub fn unassigned(&self) -> &BTreeSet<usize> {
        &self.unassigned
    }

    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// Opens a new region seeded with `area` and returns its id.
    pub fn found_region(&mut self, area: usize) -> usize {
        let region = self.regions.len();
        self.regions.push(Vec::new());
        self.frozen.push(false);
        self.assign(area, region);
        region
    }

    /// Assigns an unassigned area and updates the candidate pool: the
    /// area's own pairs are dropped, its unassigned neighbors become
    /// candidates of `region`, and the region's distances are refreshed.
    pub fn assign(&mut self, area: usize, region: usize) {
        debug_assert!(self.area2region[area].is_none());
        self.unassigned.remove(&area);
        self.area2region[area] = Some(region);
        self.regions[region].push(area);
        self.candidates.retain(|&(a, _), _| a != area);

        if self.frozen[region] {
            return;
        }
        for &nb in self.manager.neighbors(area) {
            if self.area2region[nb].is_none() && self.admits(nb, region) {
                self.candidates.insert((nb, region), 0.0);
            }
        }
        self.refresh_distances(region);
    }

    /// Stops a region from growing.
    pub fn freeze(&mut self, region: usize) {
        self.frozen[region] = true;
        self.candidates.retain(|&(_, r), _| r != region);
    }

    /// Picks one candidate (of `region` only, when given) accepted by
    /// `accept` and assigns it.
    pub fn step<R, F>(&mut self, rng: &mut R, region: Option<usize>, accept: F) -> Growth
    where
        R: Rng,
        F: Fn(usize) -> bool,
    {
        let pool: Vec<((usize, usize), f64)> = self
            .candidates
            .iter()
            .filter(|&(&(a, r), _)| region.map_or(true, |only| only == r) && accept(a))
            .map(|(&key, &d)| (key, d))
            .collect();
        match self.selection.pick(&pool, rng) {
            Some((area, region)) => {
                self.assign(area, region);
                Growth::Assigned { area, region }
            }
            None => Growth::Exhausted,
        }
    }

    /// Turns the grown regions into a partition. Every non-isolated area
    /// must be assigned.
    pub fn into_partition(self, kind: ObjectiveKind) -> PartitionState<'a> {
        debug_assert!(self.is_complete());
        PartitionState::from_regions(self.manager, self.regions, kind)
    }

    fn admits(&self, area: usize, region: usize) -> bool {
        self.restriction
            .as_ref()
            .map_or(true, |allowed| allowed[area] == region)
    }

    fn refresh_distances(&mut self, region: usize) {
        if !self.selection.uses_distance() {
            return;
        }
        let centroid = self.manager.average_attributes(&self.regions[region], None);
        let kind = self.manager.distance_kind();
        for (&(area, r), distance) in self.candidates.iter_mut() {
            if r == region {
                *distance = kind.between(self.manager.area(area).data(), &centroid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::DistanceKind;
    use crate::rng::create_rng;

    /// chain 0 - 1 - 2 - 3 - 4 with attribute = id
    fn chain(n: usize) -> AreaManager {
        AreaManager::from_lists(
            (0..n)
                .map(|i| {
                    let mut v = Vec::new();
                    if i > 0 {
                        v.push(i - 1);
                    }
                    if i + 1 < n {
                        v.push(i + 1);
                    }
                    v
                })
                .collect(),
            (0..n).map(|i| vec![i as f64]).collect(),
            DistanceKind::EuclideanSquared,
        )
        .unwrap()
    }

    #[test]
    fn test_seed_exposes_neighbors() {
        let am = chain(5);
        let mut g = Grower::new(&am, Selection::Minimum);
        let r = g.found_region(2);
        assert_eq!(r, 0);
        assert_eq!(g.candidates.keys().copied().collect::<Vec<_>>(), vec![(1, 0), (3, 0)]);
        assert_eq!(g.unassigned().len(), 4);
    }

    #[test]
    fn test_step_picks_closest_to_centroid() {
        let am = chain(5);
        let mut g = Grower::new(&am, Selection::Minimum);
        let a = g.found_region(0);
        let b = g.found_region(4);
        let mut rng = create_rng(1);
        // both candidates are one unit away from their centroid
        let first = g.step(&mut rng, None, |_| true);
        assert!(matches!(first, Growth::Assigned { .. }));
        while !g.is_complete() {
            assert!(matches!(g.step(&mut rng, None, |_| true), Growth::Assigned { .. }));
        }
        assert_eq!(g.members(a)[0], 0);
        assert_eq!(g.members(b)[0], 4);
        let state = g.into_partition(ObjectiveKind::SumSquares);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_frozen_region_exhausts() {
        let am = chain(3);
        let mut g = Grower::new(&am, Selection::Minimum);
        let r = g.found_region(0);
        g.freeze(r);
        let mut rng = create_rng(2);
        assert_eq!(g.step(&mut rng, None, |_| true), Growth::Exhausted);
        assert_eq!(g.step(&mut rng, Some(r), |_| true), Growth::Exhausted);
    }

    #[test]
    fn test_accept_filter_and_restriction() {
        let am = chain(4);
        let mut rng = create_rng(3);
        let mut g = Grower::new(&am, Selection::Minimum);
        let r = g.found_region(1);
        assert_eq!(g.step(&mut rng, Some(r), |a| a != 0 && a != 2), Growth::Exhausted);

        let mut g = Grower::new(&am, Selection::Minimum).with_restriction(vec![0, 0, 1, 1]);
        let r0 = g.found_region(0);
        let _r1 = g.found_region(3);
        assert_eq!(
            g.step(&mut rng, Some(r0), |_| true),
            Growth::Assigned { area: 1, region: 0 }
        );
        // area 2 may only join region 1
        assert_eq!(g.step(&mut rng, Some(r0), |_| true), Growth::Exhausted);
    }

    #[test]
    fn test_from_regions_exposes_enclaves() {
        let am = chain(5);
        let g = Grower::from_regions(&am, Selection::Minimum, vec![vec![0, 1], vec![3, 4]]);
        assert_eq!(g.unassigned().iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(g.candidates.keys().copied().collect::<Vec<_>>(), vec![(2, 0), (2, 1)]);
        assert!((g.candidates[&(2, 0)] - 2.25).abs() < 1e-12);
    }
}
