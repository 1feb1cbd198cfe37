//! Per-region objective cache.

use super::ObjectiveKind;
use crate::area::AreaManager;

/// Objective contribution of every region.
///
/// The cached total is re-summed from the per-region values after each
/// update, so repeated moves do not accumulate floating-point drift.
#[derive(Debug, Clone)]
pub struct ObjectiveCache {
    kind: ObjectiveKind,
    values: Vec<f64>,
    total: f64,
}

impl ObjectiveCache {
    /// Evaluates every region once.
    pub fn new<R: AsRef<[usize]>>(
        kind: ObjectiveKind,
        manager: &AreaManager,
        regions: &[R],
    ) -> Self {
        let values: Vec<f64> = regions
            .iter()
            .map(|r| kind.region_value(manager, r.as_ref()))
            .collect();
        let total = values.iter().sum();
        Self {
            kind,
            values,
            total,
        }
    }

    pub fn kind(&self) -> ObjectiveKind {
        self.kind
    }

    /// Cached contribution of a region.
    pub fn value(&self, region: usize) -> f64 {
        self.values[region]
    }

    /// Sum of all contributions.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Replaces the contributions of the regions touched by a move.
    pub fn update(&mut self, touched: &[(usize, f64)]) {
        for &(region, value) in touched {
            self.values[region] = value;
        }
        self.total = self.values.iter().sum();
    }
}
