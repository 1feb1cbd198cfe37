//! End-to-end runs of every algorithm on small synthetic maps.

use u_regionalize::area::AreaManager;
use u_regionalize::arisel::{AriselConfig, AriselRunner};
use u_regionalize::azp::{AzpConfig, AzpRunner};
use u_regionalize::construction::{construct_exogenous, ExogenousConfig};
use u_regionalize::maxp::{MaxpConfig, MaxpRunner};
use u_regionalize::objective::{DistanceKind, ObjectiveKind};
use u_regionalize::partition::PartitionState;
use u_regionalize::random::{RandomConfig, RandomRunner};
use u_regionalize::rng::create_rng;
use u_regionalize::sa::{AzpSaConfig, AzpSaRunner};
use u_regionalize::tabu::{ReactiveTabuConfig, ReactiveTabuRunner, TabuConfig, TabuRunner};
use u_regionalize::{Algorithm, RegionalizationResult, Result};

fn rook_neighbors(rows: usize, cols: usize) -> Vec<Vec<usize>> {
    (0..rows * cols)
        .map(|i| {
            let (r, c) = (i / cols, i % cols);
            let mut v = Vec::new();
            if r > 0 {
                v.push(i - cols);
            }
            if r + 1 < rows {
                v.push(i + cols);
            }
            if c > 0 {
                v.push(i - 1);
            }
            if c + 1 < cols {
                v.push(i + 1);
            }
            v
        })
        .collect()
}

fn grid(rows: usize, cols: usize, value: impl Fn(usize) -> f64) -> AreaManager {
    AreaManager::from_lists(
        rook_neighbors(rows, cols),
        (0..rows * cols).map(|i| vec![value(i)]).collect(),
        DistanceKind::EuclideanSquared,
    )
    .unwrap()
}

/// Every fixed-P algorithm with the same region count and seed.
fn run_all(am: &AreaManager, regions: usize, seed: u64) -> Vec<Result<RegionalizationResult>> {
    vec![
        AzpRunner::run(am, &AzpConfig::new(regions).with_seed(seed)),
        AzpSaRunner::run(am, &AzpSaConfig::new(regions).with_seed(seed)),
        TabuRunner::run(am, &TabuConfig::new(regions).with_seed(seed)),
        ReactiveTabuRunner::run(am, &ReactiveTabuConfig::new(regions).with_seed(seed)),
        AriselRunner::run(am, &AriselConfig::new(regions).with_seed(seed)),
        RandomRunner::run(am, &RandomConfig::new(regions).with_seed(seed)),
    ]
}

fn assert_valid(am: &AreaManager, result: &RegionalizationResult, regions: usize) {
    assert_eq!(result.r2a.len(), am.len());
    assert_eq!(result.regions, regions, "{}", result.algorithm);
    let members = result.region_members();
    assert!(members.iter().all(|m| !m.is_empty()));
    assert!(members.iter().all(|m| am.is_connected(m)));
    assert!(am.check_feasibility(&result.r2a));
}

#[test]
fn test_three_by_three_into_three_regions() {
    let am = grid(3, 3, |i| i as f64);
    for seed in 0..5 {
        for result in run_all(&am, 3, seed) {
            assert_valid(&am, &result.unwrap(), 3);
        }
    }
}

#[test]
fn test_fixed_seed_is_deterministic() {
    let am = grid(4, 4, |i| ((i * 7) % 5) as f64);
    let first = run_all(&am, 4, 2024);
    let second = run_all(&am, 4, 2024);
    for (a, b) in first.into_iter().zip(second) {
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.algorithm, b.algorithm);
        assert_eq!(a.r2a, b.r2a, "{}", a.algorithm);
        assert_eq!(a.objective, b.objective);
    }
}

#[test]
fn test_local_search_never_ends_worse() {
    let am = grid(5, 4, |i| ((i * 13) % 7) as f64);
    for seed in 0..8 {
        for result in run_all(&am, 4, seed) {
            let result = result.unwrap();
            assert!(
                result.objective <= result.initial_objective + 1e-9,
                "{} got worse",
                result.algorithm
            );
        }
    }
}

#[test]
fn test_converged_azp_is_idempotent() {
    let am = grid(4, 5, |i| ((i * 3) % 8) as f64);
    let result = AzpRunner::run(&am, &AzpConfig::new(3).with_seed(5)).unwrap();
    let mut state =
        PartitionState::from_assignment(&am, &result.r2a, ObjectiveKind::SumSquares).unwrap();
    let before = state.assignment().to_vec();
    let stats = AzpRunner::improve(&mut state, 100, &mut create_rng(99));
    assert_eq!(stats.moves, 0);
    assert_eq!(state.assignment(), before.as_slice());
    assert!((state.objective() - result.objective).abs() < 1e-9);
}

#[test]
fn test_initial_solution_is_replayed() {
    let am = grid(2, 3, |i| i as f64);
    let config = ExogenousConfig::new(2).with_initial_solution(vec![4, 4, 9, 4, 4, 9]);
    let state = construct_exogenous(&am, &config, &mut create_rng(1)).unwrap();
    assert_eq!(state.assignment(), &[0, 0, 1, 0, 0, 1]);

    let broken = ExogenousConfig::new(2).with_initial_solution(vec![0, 1, 0, 1, 1, 1]);
    assert!(construct_exogenous(&am, &broken, &mut create_rng(1)).is_err());
}

#[test]
fn test_chain_max_p() {
    let n = 5;
    let neighbors = rook_neighbors(1, n);
    let am = AreaManager::from_lists_with_threshold(
        neighbors,
        (0..n).map(|i| vec![i as f64, 1.0]).collect(),
        DistanceKind::EuclideanSquared,
    )
    .unwrap();
    let result = MaxpRunner::run(&am, &MaxpConfig::new(2.0).with_seed(12)).unwrap();
    assert_eq!(result.algorithm, Algorithm::MaxpTabu);
    assert_eq!(result.regions, 2);
    for members in result.region_members() {
        let total: f64 = members.iter().map(|&a| am.threshold_value(a)).sum();
        assert!(total >= 2.0);
        assert!(am.is_connected(&members));
    }
}

#[test]
fn test_isolated_area_stays_alone() {
    // 2x2 grid plus a fifth area with no neighbors
    let mut neighbors = rook_neighbors(2, 2);
    neighbors.push(Vec::new());
    let am = AreaManager::from_lists(
        neighbors,
        vec![vec![0.0], vec![1.0], vec![5.0], vec![6.0], vec![3.0]],
        DistanceKind::EuclideanSquared,
    )
    .unwrap();
    let result = TabuRunner::run(&am, &TabuConfig::new(2).with_seed(3)).unwrap();
    assert_eq!(result.regions, 3);
    let isolated_region = result.r2a[4];
    assert_eq!(result.r2a.iter().filter(|&&r| r == isolated_region).count(), 1);
}

#[test]
fn test_connectivity_oracle() {
    // 2x3 grid: areas 0, 1, 4, 3 form a 4-cycle
    let am = grid(2, 3, |i| i as f64);
    let state =
        PartitionState::from_assignment(&am, &[0, 0, 1, 0, 0, 1], ObjectiveKind::SumSquares)
            .unwrap();
    for area in [0, 1, 3, 4] {
        assert!(state.is_feasible_removal(0, area));
    }

    // chain 0-1-2-3: area 1 is a cut vertex of {0, 1, 2}
    let am = grid(1, 4, |i| i as f64);
    let state =
        PartitionState::from_assignment(&am, &[0, 0, 0, 1], ObjectiveKind::SumSquares).unwrap();
    assert!(!state.is_feasible_removal(0, 1));
    assert!(state.is_feasible_removal(0, 2));
}

#[test]
fn test_construction_respects_region_count() {
    let am = grid(3, 4, |i| (i % 3) as f64);
    let mut rng = create_rng(77);
    for regions in 1..am.len() {
        let state = construct_exogenous(&am, &ExogenousConfig::new(regions), &mut rng).unwrap();
        assert_eq!(state.region_count(), regions);
        assert!(state.is_consistent());
    }
    assert!(construct_exogenous(&am, &ExogenousConfig::new(am.len()), &mut rng).is_err());
}

#[test]
fn test_incremental_objectives_match_recompute() {
    let am = grid(4, 4, |i| ((i * 11) % 7) as f64);
    for kind in [ObjectiveKind::SumSquaresFast, ObjectiveKind::Clique] {
        for seed in 0..3 {
            let results = [
                AzpRunner::run(&am, &AzpConfig::new(3).with_objective(kind).with_seed(seed)),
                TabuRunner::run(&am, &TabuConfig::new(3).with_objective(kind).with_seed(seed)),
            ];
            for result in results {
                let result = result.unwrap();
                assert_eq!(result.objective_kind, kind);
                let fresh = kind.total(&am, &result.region_members());
                assert!(
                    (result.objective - fresh).abs() < 1e-6,
                    "{} {}: {} vs {}",
                    result.algorithm,
                    kind.name(),
                    result.objective,
                    fresh
                );
                assert!(result.objective <= result.initial_objective + 1e-9);
            }
        }
    }
}
