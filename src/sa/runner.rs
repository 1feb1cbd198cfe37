//! AZP-SA execution loop.

use std::collections::HashSet;
use std::time::Instant;

use rand::Rng;

use super::config::AzpSaConfig;
use crate::area::AreaManager;
use crate::azp::{can_leave, shuffled_regions};
use crate::construction::{construct_exogenous, Selection};
use crate::error::Result;
use crate::partition::{PartitionState, IMPROVEMENT_EPS};
use crate::report::{Algorithm, RegionalizationResult};
use crate::rng::rng_for;

/// Outcome of [`AzpSaRunner::anneal`].
#[derive(Debug, Clone, PartialEq)]
pub struct AzpSaStats {
    pub passes: usize,
    /// Temperature when the search stopped.
    pub final_temperature: f64,
    /// Moves accepted, improving ones included.
    pub accepted_moves: usize,
    /// Moves that lowered the best objective.
    pub improving_moves: usize,
    /// Best objective at the end of each pass.
    pub cost_history: Vec<f64>,
}

/// Executes AZP with simulated annealing acceptance.
pub struct AzpSaRunner;

impl AzpSaRunner {
    /// Constructs an initial partition and anneals it.
    pub fn run(manager: &AreaManager, config: &AzpSaConfig) -> Result<RegionalizationResult> {
        config.validate()?;
        let started = Instant::now();
        let mut rng = rng_for(config.seed);
        tracing::info!(
            algorithm = Algorithm::AzpSa.name(),
            areas = manager.len(),
            regions = config.regions,
            alpha = config.alpha,
            "regionalization started"
        );

        let mut state = construct_exogenous(manager, &config.construction(), &mut rng)?;
        let initial = state.objective();
        let stats = Self::anneal(&mut state, config, &mut rng);

        Ok(RegionalizationResult::from_state(
            &state,
            Algorithm::AzpSa,
            initial,
            started.elapsed(),
            Selection::Minimum,
            stats.cost_history,
        ))
    }

    /// Anneals `state` in place and leaves it at the best partition seen.
    ///
    /// Move generation follows AZP. A move that beats the best objective is
    /// taken at once; any other is taken with probability
    /// `exp(-(obj - current) / (current * T))`. Stops after a pass without
    /// an improving move or after `max_passes` passes.
    pub fn anneal<R: Rng>(
        state: &mut PartitionState<'_>,
        config: &AzpSaConfig,
        rng: &mut R,
    ) -> AzpSaStats {
        let mut best = state.clone();
        let mut temperature = config.initial_temperature;
        let mut passes = 0;
        let mut accepted_moves = 0;
        let mut improving_moves = 0;
        let mut cost_history = Vec::new();

        while passes < config.max_passes {
            passes += 1;
            let mut improved = false;

            for region in shuffled_regions(state, rng) {
                let mut examined: HashSet<usize> = HashSet::new();
                let mut pending = state.border_areas(region);
                while !pending.is_empty() {
                    let area = pending.swap_remove(rng.random_range(0..pending.len()));
                    examined.insert(area);
                    if !can_leave(state, region, area) {
                        continue;
                    }
                    let current = state.objective();
                    let targets: Vec<usize> = state
                        .frontier(area)
                        .iter()
                        .copied()
                        .filter(|&r| !state.is_locked(r))
                        .collect();

                    for to in targets {
                        let obj = state.move_objective(area, to);
                        if obj < best.objective() - IMPROVEMENT_EPS {
                            state.apply_move(area, to);
                            best = state.clone();
                            improved = true;
                            accepted_moves += 1;
                            improving_moves += 1;
                            pending = state.border_areas(region);
                            break;
                        }
                        if accept_worse(obj, current, temperature, rng) {
                            state.apply_move(area, to);
                            accepted_moves += 1;
                            // only areas not yet examined in this region
                            pending = state
                                .border_areas(region)
                                .into_iter()
                                .filter(|a| !examined.contains(a))
                                .collect();
                            break;
                        }
                    }
                }
            }

            cost_history.push(best.objective());
            tracing::debug!(
                pass = passes,
                temperature,
                current = state.objective(),
                best = best.objective(),
                "azp-sa pass"
            );
            temperature *= config.alpha;
            if !improved {
                break;
            }
        }

        *state = best;
        AzpSaStats {
            passes,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cost_history,
        }
    }
}

/// Metropolis rule relative to the current objective.
fn accept_worse<R: Rng>(obj: f64, current: f64, temperature: f64, rng: &mut R) -> bool {
    if current <= 0.0 || temperature <= 0.0 {
        return false;
    }
    let probability = (-(obj - current) / (current * temperature)).exp();
    rng.random::<f64>() < probability
}
