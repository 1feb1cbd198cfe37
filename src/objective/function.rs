//! Region objective functions.

use crate::area::AreaManager;

/// Heterogeneity measure minimized by every algorithm.
///
/// The objective of a partition is the sum of per-region values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveKind {
    /// Sum over member areas of the distance to the region centroid.
    /// Move evaluation recomputes every region.
    #[default]
    SumSquares,
    /// Same value as [`SumSquares`](Self::SumSquares), but move evaluation
    /// recomputes only the two regions the move touches.
    SumSquaresFast,
    /// Sum of pairwise distances between all member areas.
    Clique,
}

impl ObjectiveKind {
    /// Contribution of one region.
    ///
    /// Regions with fewer than two members contribute nothing.
    pub fn region_value(&self, manager: &AreaManager, members: &[usize]) -> f64 {
        if members.len() < 2 {
            return 0.0;
        }
        match self {
            ObjectiveKind::SumSquares | ObjectiveKind::SumSquaresFast => {
                let centroid = manager.average_attributes(members, None);
                let kind = manager.distance_kind();
                members
                    .iter()
                    .map(|&a| kind.between(manager.area(a).data(), &centroid))
                    .sum()
            }
            ObjectiveKind::Clique => {
                let mut total = 0.0;
                for (i, &a) in members.iter().enumerate() {
                    for &b in &members[i + 1..] {
                        total += manager.distance_between_areas(a, b);
                    }
                }
                total
            }
        }
    }

    /// Objective of a whole partition given as member lists.
    pub fn total<R: AsRef<[usize]>>(&self, manager: &AreaManager, regions: &[R]) -> f64 {
        regions
            .iter()
            .map(|r| self.region_value(manager, r.as_ref()))
            .sum()
    }

    /// Whether move evaluation may reuse cached values of untouched regions.
    pub fn is_incremental(&self) -> bool {
        matches!(self, ObjectiveKind::SumSquaresFast)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObjectiveKind::SumSquares => "SS",
            ObjectiveKind::SumSquaresFast => "SSFast",
            ObjectiveKind::Clique => "Clique",
        }
    }
}
