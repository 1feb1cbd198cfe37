//! The mutable partition of areas into regions.

use std::collections::BTreeSet;

use crate::area::AreaManager;
use crate::error::{RegionError, Result};
use crate::objective::{ObjectiveCache, ObjectiveKind};

/// A complete assignment of areas to contiguous regions.
///
/// Regions `0..active_regions()` take part in search. Areas without
/// neighbors are kept as locked singleton regions numbered after them.
///
/// All mutation goes through [`relocate`](Self::relocate) (or its unchecked
/// crate-internal twin), which keeps `area → region`, `region → areas`, the
/// frontier index, the objective cache and the regional threshold totals
/// consistent in one step.
#[derive(Debug, Clone)]
pub struct PartitionState<'a> {
    manager: &'a AreaManager,
    area2region: Vec<usize>,
    regions: Vec<BTreeSet<usize>>,
    frontier: Vec<BTreeSet<usize>>,
    cache: ObjectiveCache,
    thresholds: Vec<f64>,
    active: usize,
}

impl<'a> PartitionState<'a> {
    /// Builds a state from the member lists of the active regions.
    ///
    /// Every non-isolated area must appear in exactly one list; isolated
    /// areas not listed become locked singletons.
    pub(crate) fn from_regions(
        manager: &'a AreaManager,
        active_regions: Vec<Vec<usize>>,
        kind: ObjectiveKind,
    ) -> Self {
        let n = manager.len();
        let active = active_regions.len();
        let mut area2region = vec![usize::MAX; n];
        let mut regions: Vec<BTreeSet<usize>> = Vec::with_capacity(active);
        for (r, members) in active_regions.into_iter().enumerate() {
            for &a in &members {
                area2region[a] = r;
            }
            regions.push(members.into_iter().collect());
        }
        for &a in manager.isolated() {
            if area2region[a] == usize::MAX {
                area2region[a] = regions.len();
                regions.push(BTreeSet::from([a]));
            }
        }
        debug_assert!(area2region.iter().all(|&r| r != usize::MAX));

        let member_lists: Vec<Vec<usize>> =
            regions.iter().map(|s| s.iter().copied().collect()).collect();
        let cache = ObjectiveCache::new(kind, manager, &member_lists);
        let thresholds = member_lists
            .iter()
            .map(|m| m.iter().map(|&a| manager.threshold_value(a)).sum())
            .collect();

        let mut state = Self {
            manager,
            area2region,
            regions,
            frontier: vec![BTreeSet::new(); n],
            cache,
            thresholds,
            active,
        };
        for a in 0..n {
            state.frontier[a] = state.neighboring_regions(a);
        }
        state
    }

    /// Builds a state from an assignment vector with arbitrary labels.
    ///
    /// Labels are renumbered densely in order of first appearance; isolated
    /// areas become locked singletons after the active regions.
    ///
    /// # Errors
    ///
    /// [`RegionError::InfeasibleInitialSolution`] when the vector has the
    /// wrong length or a label's areas are not connected.
    pub fn from_assignment(
        manager: &'a AreaManager,
        labels: &[usize],
        kind: ObjectiveKind,
    ) -> Result<Self> {
        let groups = group_labels(manager, labels)?;
        Ok(Self::from_regions(manager, groups, kind))
    }

    pub fn manager(&self) -> &'a AreaManager {
        self.manager
    }

    /// Number of regions, locked singletons included.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of regions taking part in search.
    pub fn active_regions(&self) -> usize {
        self.active
    }

    /// Locked regions hold exactly one isolated area.
    pub fn is_locked(&self, region: usize) -> bool {
        region >= self.active
    }

    /// Region of an area.
    pub fn region_of(&self, area: usize) -> usize {
        self.area2region[area]
    }

    /// Region label per area id.
    pub fn assignment(&self) -> &[usize] {
        &self.area2region
    }

    pub fn members(&self, region: usize) -> &BTreeSet<usize> {
        &self.regions[region]
    }

    pub fn region_size(&self, region: usize) -> usize {
        self.regions[region].len()
    }

    /// Member lists of every region, in region order.
    pub fn regions(&self) -> Vec<Vec<usize>> {
        self.regions
            .iter()
            .map(|s| s.iter().copied().collect())
            .collect()
    }

    /// Regions other than its own that an area touches.
    pub fn frontier(&self, area: usize) -> &BTreeSet<usize> {
        &self.frontier[area]
    }

    pub fn is_border(&self, area: usize) -> bool {
        !self.frontier[area].is_empty()
    }

    /// Members of a region that touch another region.
    pub fn border_areas(&self, region: usize) -> Vec<usize> {
        self.regions[region]
            .iter()
            .copied()
            .filter(|&a| self.is_border(a))
            .collect()
    }

    pub fn objective_kind(&self) -> ObjectiveKind {
        self.cache.kind()
    }

    /// Current objective value.
    pub fn objective(&self) -> f64 {
        self.cache.total()
    }

    /// Cached objective contribution of a region.
    pub fn region_objective(&self, region: usize) -> f64 {
        self.cache.value(region)
    }

    /// Sum of the threshold variable over a region.
    pub fn region_threshold(&self, region: usize) -> f64 {
        self.thresholds[region]
    }

    /// Objective the partition would have after moving `area` to `to`.
    ///
    /// With [`ObjectiveKind::SumSquaresFast`] only the two touched regions
    /// are recomputed; the other kinds recompute every region.
    pub fn move_objective(&self, area: usize, to: usize) -> f64 {
        let from = self.area2region[area];
        let (from_members, to_members) = self.members_after_move(area, from, to);
        let kind = self.cache.kind();
        let from_value = kind.region_value(self.manager, &from_members);
        let to_value = kind.region_value(self.manager, &to_members);

        if kind.is_incremental() {
            self.cache.total() - self.cache.value(from) - self.cache.value(to)
                + from_value
                + to_value
        } else {
            let untouched: f64 = (0..self.regions.len())
                .filter(|&r| r != from && r != to)
                .map(|r| {
                    let members: Vec<usize> = self.regions[r].iter().copied().collect();
                    kind.region_value(self.manager, &members)
                })
                .sum();
            untouched + from_value + to_value
        }
    }

    fn members_after_move(&self, area: usize, from: usize, to: usize) -> (Vec<usize>, Vec<usize>) {
        let from_members: Vec<usize> = self.regions[from]
            .iter()
            .copied()
            .filter(|&a| a != area)
            .collect();
        let mut to_members: Vec<usize> = self.regions[to].iter().copied().collect();
        to_members.push(area);
        (from_members, to_members)
    }

    /// Moves `area` from region `from` to region `to` and returns the new
    /// objective.
    ///
    /// # Errors
    ///
    /// [`RegionError::InvalidMove`] when `from` is not the area's region,
    /// `to` is locked, not adjacent or the same region, or when the move
    /// would empty or disconnect `from`.
    pub fn relocate(&mut self, area: usize, from: usize, to: usize) -> Result<f64> {
        let invalid = |reason| RegionError::InvalidMove {
            area,
            from,
            to,
            reason,
        };
        if area >= self.area2region.len() {
            return Err(invalid("unknown area"));
        }
        if self.area2region[area] != from {
            return Err(invalid("area is not in the source region"));
        }
        if to >= self.regions.len() || to == from {
            return Err(invalid("unknown or identical target region"));
        }
        if self.is_locked(to) || self.is_locked(from) {
            return Err(invalid("locked region"));
        }
        if !self.frontier[area].contains(&to) {
            return Err(invalid("target region is not adjacent"));
        }
        if self.regions[from].len() < 2 {
            return Err(invalid("source region would become empty"));
        }
        if !self.is_feasible_removal(from, area) {
            return Err(invalid("source region would be disconnected"));
        }
        self.apply_move(area, to);
        Ok(self.objective())
    }

    /// Moves an area without validation. Callers must have checked the move
    /// with [`is_feasible_removal`](Self::is_feasible_removal).
    pub(crate) fn apply_move(&mut self, area: usize, to: usize) {
        let from = self.area2region[area];
        debug_assert_ne!(from, to);

        self.regions[from].remove(&area);
        self.regions[to].insert(area);
        self.area2region[area] = to;

        self.refresh_frontier(area);
        for &nb in self.manager.neighbors(area) {
            self.refresh_frontier(nb);
        }

        let kind = self.cache.kind();
        let from_members: Vec<usize> = self.regions[from].iter().copied().collect();
        let to_members: Vec<usize> = self.regions[to].iter().copied().collect();
        self.thresholds[from] = self.threshold_sum(&from_members);
        self.thresholds[to] = self.threshold_sum(&to_members);
        self.cache.update(&[
            (from, kind.region_value(self.manager, &from_members)),
            (to, kind.region_value(self.manager, &to_members)),
        ]);
    }

    fn threshold_sum(&self, members: &[usize]) -> f64 {
        members.iter().map(|&a| self.manager.threshold_value(a)).sum()
    }

    fn refresh_frontier(&mut self, area: usize) {
        self.frontier[area] = self.neighboring_regions(area);
    }

    fn neighboring_regions(&self, area: usize) -> BTreeSet<usize> {
        let own = self.area2region[area];
        self.manager
            .neighbors(area)
            .iter()
            .map(|&nb| self.area2region[nb])
            .filter(|&r| r != own)
            .collect()
    }

    /// Verifies every structural invariant: inverse maps, non-empty
    /// connected regions, an up-to-date frontier and objective cache.
    pub fn is_consistent(&self) -> bool {
        for (a, &r) in self.area2region.iter().enumerate() {
            if r >= self.regions.len() || !self.regions[r].contains(&a) {
                return false;
            }
        }
        let total: usize = self.regions.iter().map(BTreeSet::len).sum();
        if total != self.area2region.len() {
            return false;
        }
        for (r, members) in self.regions.iter().enumerate() {
            let list: Vec<usize> = members.iter().copied().collect();
            if list.is_empty() || !self.manager.is_connected(&list) {
                return false;
            }
            if members.iter().any(|&a| self.area2region[a] != r) {
                return false;
            }
        }
        if (0..self.area2region.len()).any(|a| self.frontier[a] != self.neighboring_regions(a)) {
            return false;
        }
        let fresh = self.cache.kind().total(self.manager, &self.regions());
        (fresh - self.objective()).abs() <= 1e-6 * fresh.abs().max(1.0)
    }
}

/// Groups an assignment vector into connected member lists of the active
/// regions, ordered by first appearance. Isolated areas are left out.
pub(crate) fn group_labels(manager: &AreaManager, labels: &[usize]) -> Result<Vec<Vec<usize>>> {
    if labels.len() != manager.len() {
        return Err(RegionError::InfeasibleInitialSolution(format!(
            "{} labels for {} areas",
            labels.len(),
            manager.len()
        )));
    }
    if !manager.check_feasibility(labels) {
        return Err(RegionError::InfeasibleInitialSolution(
            "a region is not connected".into(),
        ));
    }
    let mut order: Vec<usize> = Vec::new();
    let mut groups: std::collections::HashMap<usize, Vec<usize>> = Default::default();
    for (area, &label) in labels.iter().enumerate() {
        if manager.is_isolated(area) {
            continue;
        }
        let group = groups.entry(label).or_insert_with(|| {
            order.push(label);
            Vec::new()
        });
        group.push(area);
    }
    Ok(order
        .into_iter()
        .filter_map(|label| groups.remove(&label))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::DistanceKind;

    /// 2x3 rook grid
    /// 0 1 2
    /// 3 4 5
    fn grid() -> AreaManager {
        AreaManager::from_lists(
            vec![
                vec![1, 3],
                vec![0, 2, 4],
                vec![1, 5],
                vec![0, 4],
                vec![1, 3, 5],
                vec![2, 4],
            ],
            (0..6).map(|i| vec![i as f64]).collect(),
            DistanceKind::EuclideanSquared,
        )
        .unwrap()
    }

    #[test]
    fn test_from_assignment_relabels() {
        let am = grid();
        let state =
            PartitionState::from_assignment(&am, &[7, 7, 3, 7, 3, 3], ObjectiveKind::SumSquares)
                .unwrap();
        assert_eq!(state.assignment(), &[0, 0, 1, 0, 1, 1]);
        assert_eq!(state.region_count(), 2);
        assert_eq!(state.active_regions(), 2);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_from_assignment_rejects_disconnected() {
        let am = grid();
        let err = PartitionState::from_assignment(&am, &[0, 1, 0, 1, 1, 1], ObjectiveKind::SumSquares)
            .unwrap_err();
        assert!(matches!(err, RegionError::InfeasibleInitialSolution(_)));
    }

    #[test]
    fn test_frontier() {
        let am = grid();
        let state =
            PartitionState::from_assignment(&am, &[0, 0, 1, 0, 0, 1], ObjectiveKind::SumSquares)
                .unwrap();
        assert_eq!(state.frontier(1), &BTreeSet::from([1]));
        assert!(state.frontier(0).is_empty());
        assert_eq!(state.frontier(5), &BTreeSet::from([0]));
        assert_eq!(state.border_areas(0), vec![1, 4]);
    }

    #[test]
    fn test_relocate_updates_everything() {
        let am = grid();
        let mut state =
            PartitionState::from_assignment(&am, &[0, 0, 1, 0, 0, 1], ObjectiveKind::SumSquares)
                .unwrap();
        let predicted = state.move_objective(4, 1);
        let obj = state.relocate(4, 0, 1).unwrap();
        assert!((predicted - obj).abs() < 1e-9);
        assert_eq!(state.region_of(4), 1);
        assert!(state.members(1).contains(&4));
        assert!(!state.members(0).contains(&4));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_relocate_rejects_invalid_moves() {
        let am = grid();
        let mut state =
            PartitionState::from_assignment(&am, &[0, 0, 1, 0, 0, 1], ObjectiveKind::SumSquares)
                .unwrap();
        // wrong source
        assert!(state.relocate(4, 1, 0).is_err());
        // not adjacent
        assert!(state.relocate(0, 0, 1).is_err());
        let mut state =
            PartitionState::from_assignment(&am, &[0, 0, 0, 1, 1, 1], ObjectiveKind::SumSquares)
                .unwrap();
        // region 0 = {0,1,2}; 1 is its cut vertex
        assert!(state.relocate(1, 0, 1).is_err());
        assert!(state.relocate(2, 0, 1).is_ok());
        assert!(state.is_consistent());
        let before = state.assignment().to_vec();
        assert!(state.relocate(9, 0, 1).is_err());
        assert_eq!(state.assignment(), &before[..]);
    }

    #[test]
    fn test_fast_and_plain_move_objective_agree() {
        let am = grid();
        let plain =
            PartitionState::from_assignment(&am, &[0, 0, 1, 0, 0, 1], ObjectiveKind::SumSquares)
                .unwrap();
        let fast = PartitionState::from_assignment(
            &am,
            &[0, 0, 1, 0, 0, 1],
            ObjectiveKind::SumSquaresFast,
        )
        .unwrap();
        for (area, to) in [(1, 1), (4, 1), (2, 0), (5, 0)] {
            assert!((plain.move_objective(area, to) - fast.move_objective(area, to)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_isolated_areas_are_locked_singletons() {
        // 0 - 1   2 (isolated)
        let am = AreaManager::from_lists(
            vec![vec![1], vec![0], vec![]],
            vec![vec![0.0], vec![1.0], vec![2.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap();
        let state =
            PartitionState::from_assignment(&am, &[4, 4, 9], ObjectiveKind::SumSquares).unwrap();
        assert_eq!(state.active_regions(), 1);
        assert_eq!(state.region_count(), 2);
        assert!(state.is_locked(1));
        assert_eq!(state.region_of(2), 1);
        assert!(state.is_consistent());
    }
}
