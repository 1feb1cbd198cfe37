//! Read-only registry of areas and area-level distance functions.

use std::collections::{HashMap, VecDeque};

use super::unit::AreaUnit;
use crate::error::{RegionError, Result};
use crate::objective::{DistanceKind, RegionStatistic};

/// Registry of all [`AreaUnit`]s of a run.
///
/// Built once from a neighbor map and an attribute map, then shared
/// read-only by every construction and search (it is `Sync`, so parallel
/// construction workers can borrow it concurrently).
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_regionalize::area::AreaManager;
/// use u_regionalize::objective::DistanceKind;
///
/// // 0 - 1 - 2
/// let neighbors = HashMap::from([(0, vec![1]), (1, vec![0, 2]), (2, vec![1])]);
/// let attributes = HashMap::from([(0, vec![1.0]), (1, vec![2.0]), (2, vec![4.0])]);
///
/// let am = AreaManager::build(&neighbors, &attributes, DistanceKind::EuclideanSquared).unwrap();
/// assert_eq!(am.len(), 3);
/// assert!((am.distance_between_areas(0, 2) - 9.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct AreaManager {
    areas: Vec<AreaUnit>,
    distance: DistanceKind,
    dims: usize,
    isolated: Vec<usize>,
    component_of: Vec<usize>,
    component_count: usize,
}

impl AreaManager {
    /// Builds the registry from maps keyed by area ids `0..N`.
    ///
    /// # Errors
    ///
    /// - [`RegionError::MalformedAttributes`] when the attribute keys have
    ///   gaps or the vectors are empty, ragged or non-finite.
    /// - [`RegionError::MalformedGraph`] when a neighbor list is missing,
    ///   references an unknown id or the area itself, or when adjacency is
    ///   not symmetric.
    pub fn build(
        neighbors: &HashMap<usize, Vec<usize>>,
        attributes: &HashMap<usize, Vec<f64>>,
        distance: DistanceKind,
    ) -> Result<Self> {
        let (neighbors, attributes) = flatten_maps(neighbors, attributes)?;
        Self::from_parts(neighbors, attributes, distance, false)
    }

    /// Like [`build`](Self::build), but splits the last attribute column off
    /// as the extensive threshold variable used by max-p construction.
    ///
    /// # Errors
    ///
    /// In addition to the [`build`](Self::build) errors, fails with
    /// [`RegionError::MalformedAttributes`] when a threshold value is
    /// negative.
    pub fn build_with_threshold(
        neighbors: &HashMap<usize, Vec<usize>>,
        attributes: &HashMap<usize, Vec<f64>>,
        distance: DistanceKind,
    ) -> Result<Self> {
        let (neighbors, attributes) = flatten_maps(neighbors, attributes)?;
        Self::from_parts(neighbors, attributes, distance, true)
    }

    /// Builds the registry from vectors indexed by area id.
    pub fn from_lists(
        neighbors: Vec<Vec<usize>>,
        attributes: Vec<Vec<f64>>,
        distance: DistanceKind,
    ) -> Result<Self> {
        Self::from_parts(neighbors, attributes, distance, false)
    }

    /// Vector-indexed form of [`build_with_threshold`](Self::build_with_threshold).
    pub fn from_lists_with_threshold(
        neighbors: Vec<Vec<usize>>,
        attributes: Vec<Vec<f64>>,
        distance: DistanceKind,
    ) -> Result<Self> {
        Self::from_parts(neighbors, attributes, distance, true)
    }

    fn from_parts(
        mut neighbors: Vec<Vec<usize>>,
        attributes: Vec<Vec<f64>>,
        distance: DistanceKind,
        split_threshold: bool,
    ) -> Result<Self> {
        let n = attributes.len();
        if n == 0 {
            return Err(RegionError::MalformedAttributes("no areas".into()));
        }
        if neighbors.len() != n {
            return Err(RegionError::MalformedGraph(format!(
                "{} neighbor lists for {} areas",
                neighbors.len(),
                n
            )));
        }

        let width = attributes[0].len();
        if width == 0 {
            return Err(RegionError::MalformedAttributes(
                "attribute vectors are empty".into(),
            ));
        }
        for (id, row) in attributes.iter().enumerate() {
            if row.len() != width {
                return Err(RegionError::MalformedAttributes(format!(
                    "area {id} has {} attributes, expected {width}",
                    row.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(RegionError::MalformedAttributes(format!(
                    "area {id} has a non-finite attribute"
                )));
            }
        }

        for (id, list) in neighbors.iter_mut().enumerate() {
            if let Some(&bad) = list.iter().find(|&&j| j >= n) {
                return Err(RegionError::MalformedGraph(format!(
                    "area {id} references unknown area {bad}"
                )));
            }
            if list.contains(&id) {
                return Err(RegionError::MalformedGraph(format!(
                    "area {id} lists itself as a neighbor"
                )));
            }
            list.sort_unstable();
            list.dedup();
        }
        for (id, list) in neighbors.iter().enumerate() {
            for &j in list {
                if neighbors[j].binary_search(&id).is_err() {
                    return Err(RegionError::MalformedGraph(format!(
                        "adjacency is not symmetric: {id} -> {j} but not {j} -> {id}"
                    )));
                }
            }
        }

        let mut areas = Vec::with_capacity(n);
        for (id, (list, mut row)) in neighbors.into_iter().zip(attributes).enumerate() {
            let threshold = if split_threshold {
                let value = row.pop().unwrap_or_default();
                if value < 0.0 {
                    return Err(RegionError::MalformedAttributes(format!(
                        "area {id} has negative threshold value {value}"
                    )));
                }
                Some(value)
            } else {
                None
            };
            areas.push(AreaUnit::new(id, list, row, threshold));
        }

        let dims = areas[0].data().len();
        let isolated: Vec<usize> = areas
            .iter()
            .filter(|a| a.is_isolated())
            .map(|a| a.id())
            .collect();
        if !isolated.is_empty() {
            tracing::warn!(count = isolated.len(), areas = ?isolated, "areas without neighbors");
        }

        let mut manager = Self {
            areas,
            distance,
            dims,
            isolated,
            component_of: Vec::new(),
            component_count: 0,
        };
        manager.label_components();
        Ok(manager)
    }

    fn label_components(&mut self) {
        let n = self.areas.len();
        let mut component_of = vec![usize::MAX; n];
        let mut count = 0;
        let mut queue = VecDeque::new();
        for start in 0..n {
            if component_of[start] != usize::MAX {
                continue;
            }
            component_of[start] = count;
            queue.push_back(start);
            while let Some(a) = queue.pop_front() {
                for &b in self.areas[a].neighbors() {
                    if component_of[b] == usize::MAX {
                        component_of[b] = count;
                        queue.push_back(b);
                    }
                }
            }
            count += 1;
        }
        self.component_of = component_of;
        self.component_count = count;
    }

    /// Number of areas.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Always `false` for a successfully built manager.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Number of attributes used in distances.
    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn distance_kind(&self) -> DistanceKind {
        self.distance
    }

    /// The area with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id >= len()`.
    pub fn area(&self, id: usize) -> &AreaUnit {
        &self.areas[id]
    }

    pub fn areas(&self) -> &[AreaUnit] {
        &self.areas
    }

    pub fn neighbors(&self, id: usize) -> &[usize] {
        self.areas[id].neighbors()
    }

    /// Areas without neighbors, in ascending order.
    pub fn isolated(&self) -> &[usize] {
        &self.isolated
    }

    pub fn is_isolated(&self, id: usize) -> bool {
        self.areas[id].is_isolated()
    }

    /// Whether the areas carry a threshold variable.
    pub fn has_threshold(&self) -> bool {
        self.areas[0].threshold().is_some()
    }

    /// Threshold value of an area, `0.0` when the manager has none.
    pub fn threshold_value(&self, id: usize) -> f64 {
        self.areas[id].threshold().unwrap_or(0.0)
    }

    /// Sum of the threshold variable over all areas.
    pub fn total_threshold(&self) -> f64 {
        self.areas.iter().filter_map(|a| a.threshold()).sum()
    }

    /// Connected component label of an area.
    pub fn component_of(&self, id: usize) -> usize {
        self.component_of[id]
    }

    /// Number of connected components, isolated areas included.
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Number of connected components made of more than one area.
    pub fn connected_component_count(&self) -> usize {
        self.component_count - self.isolated.len()
    }

    /// Area ids grouped by connected component, in component label order.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.component_count];
        for (id, &c) in self.component_of.iter().enumerate() {
            groups[c].push(id);
        }
        groups
    }

    /// Distance between two areas' attribute vectors.
    pub fn distance_between_areas(&self, a: usize, b: usize) -> f64 {
        if a == b {
            return 0.0;
        }
        self.distance
            .between(self.areas[a].data(), self.areas[b].data())
    }

    /// Componentwise mean of the given areas' attributes.
    ///
    /// `dims` selects attribute indices; `None` uses all of them. An empty
    /// area list yields zeros.
    pub fn average_attributes(&self, areas: &[usize], dims: Option<&[usize]>) -> Vec<f64> {
        let width = dims.map_or(self.dims, <[usize]>::len);
        let mut avg = vec![0.0; width];
        if areas.is_empty() {
            return avg;
        }
        for &id in areas {
            let data = self.areas[id].data();
            match dims {
                Some(idx) => {
                    for (slot, &i) in avg.iter_mut().zip(idx) {
                        *slot += data[i];
                    }
                }
                None => {
                    for (slot, v) in avg.iter_mut().zip(data) {
                        *slot += v;
                    }
                }
            }
        }
        let count = areas.len() as f64;
        for slot in &mut avg {
            *slot /= count;
        }
        avg
    }

    /// Distance from an area to a region given by its member ids.
    pub fn distance_area_to_region(
        &self,
        area: usize,
        region: &[usize],
        statistic: RegionStatistic,
    ) -> f64 {
        match statistic {
            RegionStatistic::Centroid => {
                let centroid = self.average_attributes(region, None);
                self.distance.between(self.areas[area].data(), &centroid)
            }
        }
    }

    /// Whether `members` induce a connected subgraph. Empty and singleton
    /// sets are connected.
    pub fn is_connected(&self, members: &[usize]) -> bool {
        if members.len() <= 1 {
            return true;
        }
        let mut inside = vec![false; self.areas.len()];
        for &a in members {
            inside[a] = true;
        }
        let mut seen = vec![false; self.areas.len()];
        let mut stack = vec![members[0]];
        seen[members[0]] = true;
        let mut reached = 1;
        while let Some(a) = stack.pop() {
            for &b in self.areas[a].neighbors() {
                if inside[b] && !seen[b] {
                    seen[b] = true;
                    reached += 1;
                    stack.push(b);
                }
            }
        }
        reached == members.len()
    }

    /// Checks that an assignment vector (region label per area) covers every
    /// area and that every region is internally connected.
    pub fn check_feasibility(&self, assignment: &[usize]) -> bool {
        if assignment.len() != self.areas.len() {
            return false;
        }
        let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
        for (area, &label) in assignment.iter().enumerate() {
            groups.entry(label).or_default().push(area);
        }
        groups.values().all(|members| self.is_connected(members))
    }
}

fn flatten_maps(
    neighbors: &HashMap<usize, Vec<usize>>,
    attributes: &HashMap<usize, Vec<f64>>,
) -> Result<(Vec<Vec<usize>>, Vec<Vec<f64>>)> {
    let n = attributes.len();
    let mut rows = Vec::with_capacity(n);
    for id in 0..n {
        let row = attributes.get(&id).ok_or_else(|| {
            RegionError::MalformedAttributes(format!("attribute ids have a gap at {id}"))
        })?;
        rows.push(row.clone());
    }
    if let Some(&bad) = neighbors.keys().find(|&&k| k >= n) {
        return Err(RegionError::MalformedGraph(format!(
            "neighbor map has unknown area {bad}"
        )));
    }
    let mut lists = Vec::with_capacity(n);
    for id in 0..n {
        let list = neighbors.get(&id).ok_or_else(|| {
            RegionError::MalformedGraph(format!("no neighbor list for area {id}"))
        })?;
        lists.push(list.clone());
    }
    Ok((lists, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Vec<Vec<usize>> {
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
            .collect()
    }

    #[test]
    fn test_build_from_maps() {
        let neighbors = HashMap::from([(0, vec![1]), (1, vec![0]), (2, vec![])]);
        let attributes = HashMap::from([(0, vec![0.0]), (1, vec![2.0]), (2, vec![5.0])]);
        let am = AreaManager::build(&neighbors, &attributes, DistanceKind::EuclideanSquared)
            .unwrap();
        assert_eq!(am.len(), 3);
        assert_eq!(am.isolated(), &[2]);
        assert_eq!(am.component_count(), 2);
        assert_eq!(am.connected_component_count(), 1);
        assert_eq!(am.components(), vec![vec![0, 1], vec![2]]);
        assert!(!am.has_threshold());
    }

    #[test]
    fn test_attribute_gap_rejected() {
        let neighbors = HashMap::from([(0, vec![]), (2, vec![])]);
        let attributes = HashMap::from([(0, vec![0.0]), (2, vec![1.0])]);
        let err = AreaManager::build(&neighbors, &attributes, DistanceKind::EuclideanSquared)
            .unwrap_err();
        assert!(matches!(err, RegionError::MalformedAttributes(_)));
    }

    #[test]
    fn test_missing_neighbor_list_rejected() {
        let neighbors = HashMap::from([(0, vec![1])]);
        let attributes = HashMap::from([(0, vec![0.0]), (1, vec![1.0])]);
        let err = AreaManager::build(&neighbors, &attributes, DistanceKind::EuclideanSquared)
            .unwrap_err();
        assert!(matches!(err, RegionError::MalformedGraph(_)));
    }

    #[test]
    fn test_out_of_range_neighbor_rejected() {
        let err = AreaManager::from_lists(
            vec![vec![1], vec![0, 7]],
            vec![vec![0.0], vec![1.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap_err();
        assert!(matches!(err, RegionError::MalformedGraph(_)));
    }

    #[test]
    fn test_asymmetric_rejected() {
        let err = AreaManager::from_lists(
            vec![vec![1], vec![]],
            vec![vec![0.0], vec![1.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap_err();
        assert!(matches!(err, RegionError::MalformedGraph(_)));
    }

    #[test]
    fn test_self_loop_rejected() {
        let err = AreaManager::from_lists(
            vec![vec![0]],
            vec![vec![0.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap_err();
        assert!(matches!(err, RegionError::MalformedGraph(_)));
    }

    #[test]
    fn test_ragged_attributes_rejected() {
        let err = AreaManager::from_lists(
            chain(2),
            vec![vec![0.0, 1.0], vec![1.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap_err();
        assert!(matches!(err, RegionError::MalformedAttributes(_)));
    }

    #[test]
    fn test_duplicate_neighbors_deduplicated() {
        let am = AreaManager::from_lists(
            vec![vec![1, 1], vec![0]],
            vec![vec![0.0], vec![1.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap();
        assert_eq!(am.neighbors(0), &[1]);
    }

    #[test]
    fn test_threshold_split() {
        let am = AreaManager::from_lists_with_threshold(
            chain(3),
            vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap();
        assert!(am.has_threshold());
        assert_eq!(am.dims(), 1);
        assert_eq!(am.area(1).data(), &[2.0]);
        assert_eq!(am.area(1).threshold(), Some(20.0));
        assert!((am.total_threshold() - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = AreaManager::from_lists_with_threshold(
            chain(2),
            vec![vec![1.0, -1.0], vec![2.0, 1.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap_err();
        assert!(matches!(err, RegionError::MalformedAttributes(_)));
    }

    #[test]
    fn test_average_and_region_distance() {
        let am = AreaManager::from_lists(
            chain(3),
            vec![vec![0.0, 10.0], vec![2.0, 20.0], vec![4.0, 60.0]],
            DistanceKind::EuclideanSquared,
        )
        .unwrap();
        assert_eq!(am.average_attributes(&[0, 1], None), vec![1.0, 15.0]);
        assert_eq!(am.average_attributes(&[0, 1, 2], Some(&[0])), vec![2.0]);
        assert_eq!(am.average_attributes(&[], None), vec![0.0, 0.0]);

        // centroid of {0, 1} is (1, 15); area 2 is (4, 60)
        let d = am.distance_area_to_region(2, &[0, 1], RegionStatistic::Centroid);
        assert!((d - (9.0 + 2025.0)).abs() < 1e-9);
    }

    #[test]
    fn test_check_feasibility() {
        let am = AreaManager::from_lists(
            chain(4),
            vec![vec![0.0]; 4],
            DistanceKind::EuclideanSquared,
        )
        .unwrap();
        assert!(am.check_feasibility(&[0, 0, 1, 1]));
        assert!(!am.check_feasibility(&[0, 1, 0, 1]));
        assert!(!am.check_feasibility(&[0, 0, 1]));
        assert!(am.is_connected(&[1, 2, 3]));
        assert!(!am.is_connected(&[0, 2]));
    }
}
