//! Area-to-area distances and solution similarity.

/// Distance between two attribute vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceKind {
    /// Sum of squared componentwise differences.
    #[default]
    EuclideanSquared,
}

impl DistanceKind {
    /// Distance between `a` and `b`.
    ///
    /// Both slices are expected to have the same length; extra trailing
    /// components of the longer one are ignored.
    ///
    /// ```
    /// use u_regionalize::objective::DistanceKind;
    ///
    /// let d = DistanceKind::EuclideanSquared.between(&[1.0, 2.0], &[4.0, 6.0]);
    /// assert!((d - 25.0).abs() < 1e-12);
    /// ```
    pub fn between(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            DistanceKind::EuclideanSquared => a
                .iter()
                .zip(b)
                .map(|(x, y)| {
                    let d = x - y;
                    d * d
                })
                .sum(),
        }
    }

    /// Short name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceKind::EuclideanSquared => "EuclideanSquared",
        }
    }
}

/// How the distance from an area to a region is summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegionStatistic {
    /// Distance to the componentwise mean of the region's attributes.
    #[default]
    Centroid,
}

impl RegionStatistic {
    pub fn name(&self) -> &'static str {
        match self {
            RegionStatistic::Centroid => "Centroid",
        }
    }
}

/// Similarity of two assignment vectors in `[0, 1]`.
///
/// Region labels are arbitrary, so both vectors are first recoded by order
/// of first appearance. The result is the share of positions whose recoded
/// labels agree; a length difference counts as disagreement.
///
/// ```
/// use u_regionalize::objective::solution_similarity;
///
/// let x = [3, 1, 1, 0, 3, 0, 1, 0, 2, 0, 0, 3, 2, 2, 3, 3];
/// let y = [0, 0, 0, 3, 0, 3, 3, 3, 2, 3, 3, 1, 2, 2, 1, 1];
/// assert!((solution_similarity(&x, &y) - 0.1875).abs() < 1e-12);
/// ```
pub fn solution_similarity(x: &[usize], y: &[usize]) -> f64 {
    let max_len = x.len().max(y.len());
    if max_len == 0 {
        return 1.0;
    }
    let min_len = x.len().min(y.len());
    let xr = recode(x);
    let yr = recode(y);
    let mismatches = xr.iter().zip(&yr).filter(|(a, b)| a != b).count();
    let distance = (max_len - min_len) + mismatches;
    (max_len - distance) as f64 / max_len as f64
}

/// Relabels regions in order of first appearance.
fn recode(labels: &[usize]) -> Vec<usize> {
    let mut seen = std::collections::HashMap::new();
    labels
        .iter()
        .map(|&l| {
            let next = seen.len();
            *seen.entry(l).or_insert(next)
        })
        .collect()
}
