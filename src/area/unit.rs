//! A single atomic area.

/// One atomic area: its id, contiguity neighbors and attribute vector.
///
/// Areas are created once by [`AreaManager`](super::AreaManager) and never
/// change during a run. When the manager is built with a threshold column,
/// the last attribute is split off into [`threshold`](Self::threshold) and
/// no longer takes part in distance computations.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaUnit {
    id: usize,
    neighbors: Vec<usize>,
    data: Vec<f64>,
    threshold: Option<f64>,
}

impl AreaUnit {
    pub(crate) fn new(
        id: usize,
        neighbors: Vec<usize>,
        data: Vec<f64>,
        threshold: Option<f64>,
    ) -> Self {
        Self {
            id,
            neighbors,
            data,
            threshold,
        }
    }

    /// Area id in `0..N`.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Sorted, deduplicated neighbor ids.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Attribute vector used for distances and objectives.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Extensive attribute constrained by the endogenous constructions.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// `true` when the area has no contiguity neighbor.
    pub fn is_isolated(&self) -> bool {
        self.neighbors.is_empty()
    }
}
