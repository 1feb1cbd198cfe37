//! Contiguity oracle.

use std::collections::HashSet;

use super::PartitionState;

impl PartitionState<'_> {
    /// Whether `region` stays connected once `area` is taken out of it.
    ///
    /// Traverses the region's remaining members through neighbors that are
    /// also in the region. Regions with at most one member trivially pass;
    /// callers that must not empty a region check its size separately.
    pub fn is_feasible_removal(&self, region: usize, area: usize) -> bool {
        let members = self.members(region);
        if members.len() <= 1 {
            return true;
        }
        let Some(&start) = members.iter().find(|&&a| a != area) else {
            return true;
        };
        let remaining = members.len() - usize::from(members.contains(&area));

        let mut seen = HashSet::with_capacity(remaining);
        seen.insert(start);
        let mut stack = vec![start];
        while let Some(a) = stack.pop() {
            for &nb in self.manager().neighbors(a) {
                if nb != area && self.region_of(nb) == region && seen.insert(nb) {
                    stack.push(nb);
                }
            }
        }
        seen.len() == remaining
    }
}

#[cfg(test)]
mod tests {
    use crate::area::AreaManager;
    use crate::objective::{DistanceKind, ObjectiveKind};
    use crate::partition::PartitionState;

    fn manager(neighbors: Vec<Vec<usize>>) -> AreaManager {
        let n = neighbors.len();
        AreaManager::from_lists(
            neighbors,
            (0..n).map(|i| vec![i as f64]).collect(),
            DistanceKind::EuclideanSquared,
        )
        .unwrap()
    }

    #[test]
    fn test_cycle_any_removal_feasible() {
        // 0 - 1
        // |   |
        // 3 - 2
        let am = manager(vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![0, 2]]);
        let state = PartitionState::from_assignment(&am, &[0, 0, 0, 0], ObjectiveKind::SumSquares)
            .unwrap();
        for a in 0..4 {
            assert!(state.is_feasible_removal(0, a), "removing {a} from a 4-cycle");
        }
    }

    #[test]
    fn test_star_cut_vertex_infeasible() {
        // hub 0 with leaves 1, 2, 3; leaf 4 hangs off 1; area 5 is another region
        let am = manager(vec![
            vec![1, 2, 3],
            vec![0, 4],
            vec![0, 5],
            vec![0],
            vec![1],
            vec![2],
        ]);
        let state =
            PartitionState::from_assignment(&am, &[0, 0, 0, 0, 0, 1], ObjectiveKind::SumSquares)
                .unwrap();
        assert!(!state.is_feasible_removal(0, 0));
        assert!(!state.is_feasible_removal(0, 1));
        assert!(state.is_feasible_removal(0, 2));
        assert!(state.is_feasible_removal(0, 3));
        assert!(state.is_feasible_removal(0, 4));
    }

    #[test]
    fn test_singleton_short_circuits() {
        let am = manager(vec![vec![1], vec![0]]);
        let state =
            PartitionState::from_assignment(&am, &[0, 1], ObjectiveKind::SumSquares).unwrap();
        assert!(state.is_feasible_removal(0, 0));
        assert!(state.is_feasible_removal(1, 1));
    }
}
