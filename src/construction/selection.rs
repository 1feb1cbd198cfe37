//! Candidate selection rules for region growing.

use rand::Rng;

/// How the next (area, region) pair is picked from the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// The pair with the smallest area-to-centroid distance; ties broken
    /// uniformly at random.
    #[default]
    Minimum,
    /// A uniformly random pair; distances are not computed.
    FullRandom,
}

impl Selection {
    pub fn name(&self) -> &'static str {
        match self {
            Selection::Minimum => "Minimum",
            Selection::FullRandom => "FullRandom",
        }
    }

    /// Whether candidates need their distance to the region computed.
    pub(crate) fn uses_distance(&self) -> bool {
        matches!(self, Selection::Minimum)
    }

    /// Picks one entry of `pool`, or `None` when it is empty.
    pub(crate) fn pick<R: Rng>(&self, pool: &[((usize, usize), f64)], rng: &mut R) -> Option<(usize, usize)> {
        if pool.is_empty() {
            return None;
        }
        match self {
            Selection::Minimum => {
                let min = pool
                    .iter()
                    .map(|&(_, d)| d)
                    .fold(f64::INFINITY, f64::min);
                let ties: Vec<(usize, usize)> = pool
                    .iter()
                    .filter(|&&(_, d)| d == min)
                    .map(|&(key, _)| key)
                    .collect();
                Some(ties[rng.random_range(0..ties.len())])
            }
            Selection::FullRandom => Some(pool[rng.random_range(0..pool.len())].0),
        }
    }
}
