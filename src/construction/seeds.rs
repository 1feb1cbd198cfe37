//! k-means++ seed selection.

use std::collections::HashSet;

use rand::Rng;

use crate::area::AreaManager;

/// Draws `count` distinct seed areas by k-means++ weighted sampling.
///
/// The first seed is uniform; each following one is drawn with probability
/// proportional to its distance to the nearest seed already chosen, or
/// uniformly when every remaining weight is zero. Isolated areas are never
/// seeds. Once the seeds still to place equal the number of unseeded graph
/// components, sampling is restricted to those components so each of them
/// receives a seed.
///
/// Callers guarantee `count` is at least the number of connected components
/// and at most the number of non-isolated areas.
pub(crate) fn kmeans_seeds<R: Rng>(manager: &AreaManager, count: usize, rng: &mut R) -> Vec<usize> {
    let pool: Vec<usize> = (0..manager.len())
        .filter(|&a| !manager.is_isolated(a))
        .collect();
    let components = manager.connected_component_count();

    let mut seeds = Vec::with_capacity(count);
    let mut chosen = vec![false; manager.len()];
    let mut nearest = vec![f64::INFINITY; manager.len()];
    let mut seeded: HashSet<usize> = HashSet::new();

    while seeds.len() < count && seeds.len() < pool.len() {
        let restrict = count - seeds.len() <= components - seeded.len();
        let eligible: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|&a| !chosen[a])
            .filter(|&a| !restrict || !seeded.contains(&manager.component_of(a)))
            .collect();
        if eligible.is_empty() {
            break;
        }

        let pick = if seeds.is_empty() {
            eligible[rng.random_range(0..eligible.len())]
        } else {
            roulette(&eligible, &nearest, rng)
        };

        seeds.push(pick);
        chosen[pick] = true;
        seeded.insert(manager.component_of(pick));
        for &a in &pool {
            let d = manager.distance_between_areas(a, pick);
            if d < nearest[a] {
                nearest[a] = d;
            }
        }
    }
    seeds
}

fn roulette<R: Rng>(eligible: &[usize], weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = eligible.iter().map(|&a| weights[a]).sum();
    if total <= 0.0 || !total.is_finite() {
        return eligible[rng.random_range(0..eligible.len())];
    }
    let target = rng.random::<f64>() * total;
    let mut acc = 0.0;
    for &a in eligible {
        acc += weights[a];
        if acc >= target && weights[a] > 0.0 {
            return a;
        }
    }
    eligible[eligible.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::DistanceKind;
    use crate::rng::create_rng;

    #[test]
    fn test_distinct_non_isolated_seeds() {
        // 0 - 1 - 2 - 3, 4 isolated
        let am = AreaManager::from_lists(
            vec![vec![1], vec![0, 2], vec![1, 3], vec![2], vec![]],
            (0..5).map(|i| vec![i as f64]).collect(),
            DistanceKind::EuclideanSquared,
        )
        .unwrap();
        let mut rng = create_rng(5);
        for _ in 0..50 {
            let seeds = kmeans_seeds(&am, 3, &mut rng);
            assert_eq!(seeds.len(), 3);
            let unique: HashSet<_> = seeds.iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(!seeds.contains(&4));
        }
    }

    #[test]
    fn test_identical_attributes_fall_back_to_uniform() {
        let am = AreaManager::from_lists(
            vec![vec![1], vec![0, 2], vec![1]],
            vec![vec![1.0]; 3],
            DistanceKind::EuclideanSquared,
        )
        .unwrap();
        let mut rng = create_rng(9);
        let seeds = kmeans_seeds(&am, 3, &mut rng);
        let mut sorted = seeds.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn test_every_component_seeded() {
        // two components {0,1,2} and {3,4}; attributes make the second one
        // the less attractive target
        let am = AreaManager::from_lists(
            vec![vec![1], vec![0, 2], vec![1], vec![4], vec![3]],
            vec![
                vec![0.0],
                vec![100.0],
                vec![200.0],
                vec![1.0],
                vec![1.0],
            ],
            DistanceKind::EuclideanSquared,
        )
        .unwrap();
        let mut rng = create_rng(11);
        for _ in 0..50 {
            let seeds = kmeans_seeds(&am, 2, &mut rng);
            let comps: HashSet<usize> = seeds.iter().map(|&s| am.component_of(s)).collect();
            assert_eq!(comps.len(), 2, "seeds {seeds:?} miss a component");
        }
    }
}
