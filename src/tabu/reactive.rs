//! Reactive tabu search.
//!
//! The tabu length reacts to cycling: it grows whenever the search
//! revisits a partition and shrinks after a stretch of rounds without
//! revisits longer than the average cycle length. When too many
//! partitions have been visited more than `repetition_limit` times, the
//! search is kicked by a burst of random feasible moves.
//!
//! # Reference
//!
//! Battiti, R. & Tecchiolli, G. (1994). "The Reactive Tabu Search",
//! *ORSA Journal on Computing* 6(2), 126-140.

use std::collections::HashMap;
use std::time::Instant;

use rand::Rng;

use super::config::{default_conv_tabu, ReactiveTabuConfig};
use super::list::TabuList;
use crate::area::AreaManager;
use crate::construction::{construct_exogenous, Selection};
use crate::error::Result;
use crate::partition::{MoveConstraint, PartitionState, IMPROVEMENT_EPS};
use crate::report::{Algorithm, RegionalizationResult};
use crate::rng::rng_for;

const INCREASE: f64 = 1.1;
const DECREASE: f64 = 0.9;

/// Outcome of [`ReactiveTabuRunner::improve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReactiveTabuStats {
    pub rounds: usize,
    pub moves: usize,
    /// Diversification bursts performed.
    pub kicks: usize,
    /// Tabu length when the search stopped.
    pub final_tabu_length: usize,
    /// Best objective after each round.
    pub cost_history: Vec<f64>,
}

/// Visit bookkeeping of one partition.
#[derive(Debug, Clone, Copy)]
struct Visit {
    last_round: usize,
    count: usize,
}

/// Executes AZP with reactive tabu search.
pub struct ReactiveTabuRunner;

impl ReactiveTabuRunner {
    /// Constructs an initial partition and improves it.
    pub fn run(manager: &AreaManager, config: &ReactiveTabuConfig) -> Result<RegionalizationResult> {
        config.validate()?;
        let started = Instant::now();
        let mut rng = rng_for(config.seed);
        tracing::info!(
            algorithm = Algorithm::AzpReactiveTabu.name(),
            areas = manager.len(),
            regions = config.regions,
            "regionalization started"
        );

        let mut state = construct_exogenous(manager, &config.construction(), &mut rng)?;
        let initial = state.objective();
        let conv_tabu = config
            .conv_tabu
            .unwrap_or_else(|| default_conv_tabu(manager.len(), state.active_regions()));
        let stats = Self::improve(&mut state, config, conv_tabu, &mut rng);

        Ok(RegionalizationResult::from_state(
            &state,
            Algorithm::AzpReactiveTabu,
            initial,
            started.elapsed(),
            Selection::Minimum,
            stats.cost_history,
        ))
    }

    /// Runs the reactive search on `state` and leaves it at the best
    /// partition seen.
    pub fn improve<R: Rng>(
        state: &mut PartitionState<'_>,
        config: &ReactiveTabuConfig,
        conv_tabu: usize,
        rng: &mut R,
    ) -> ReactiveTabuStats {
        let mut best = state.clone();
        let mut tabu = TabuList::new(1);
        let mut length = 1.0_f64;
        let mut r_avg = 1.0_f64;
        let mut since_change = 0usize;
        let mut visits: HashMap<Vec<usize>, Visit> = HashMap::new();
        let mut chaotic = 0usize;

        let mut stall = 0;
        let mut rounds = 0;
        let mut moves = 0;
        let mut kicks = 0;
        let mut cost_history = Vec::new();

        while stall < conv_tabu {
            rounds += 1;
            let aspiration = best.objective();
            let mut catalogue = state.feasible_moves(MoveConstraint::Contiguity);
            if catalogue.is_empty() {
                break;
            }
            catalogue.sort_by(|a, b| {
                a.objective
                    .total_cmp(&b.objective)
                    .then(a.area.cmp(&b.area))
                    .then(a.to.cmp(&b.to))
            });
            let chosen = catalogue.into_iter().find(|mv| {
                !tabu.contains(mv.area, mv.to) || aspiration - mv.objective > IMPROVEMENT_EPS
            });
            let Some(mv) = chosen else {
                tabu.age();
                stall += 1;
                cost_history.push(best.objective());
                continue;
            };

            tabu.push(mv.area, mv.from);
            state.apply_move(mv.area, mv.to);
            moves += 1;
            let mut improved = false;
            if aspiration - state.objective() > IMPROVEMENT_EPS {
                best = state.clone();
                improved = true;
            }

            // react to the visit history of the new partition
            let key = state.assignment().to_vec();
            let mut kick = false;
            match visits.get_mut(&key) {
                Some(visit) => {
                    let cycle = (rounds - visit.last_round) as f64;
                    visit.last_round = rounds;
                    visit.count += 1;
                    if visit.count > config.repetition_limit {
                        chaotic += 1;
                        kick = chaotic >= config.chaos_limit;
                    }
                    r_avg = 0.1 * cycle + 0.9 * r_avg;
                    length = (length * INCREASE).max(length + 1.0);
                    since_change = 0;
                }
                None => {
                    visits.insert(
                        key,
                        Visit {
                            last_round: rounds,
                            count: 1,
                        },
                    );
                    since_change += 1;
                    if since_change as f64 > r_avg {
                        length = (length * DECREASE).max(1.0);
                        since_change = 0;
                    }
                }
            }
            tabu.set_capacity(length.round() as usize);

            if kick {
                kicks += 1;
                visits.clear();
                chaotic = 0;
                let steps = 1 + (r_avg / 2.0) as usize;
                tracing::debug!(round = rounds, steps, "reactive tabu kick");
                for _ in 0..steps {
                    let options = state.feasible_moves(MoveConstraint::Contiguity);
                    if options.is_empty() {
                        break;
                    }
                    let random = options[rng.random_range(0..options.len())];
                    tabu.push(random.area, random.from);
                    state.apply_move(random.area, random.to);
                    moves += 1;
                    if best.objective() - state.objective() > IMPROVEMENT_EPS {
                        best = state.clone();
                        improved = true;
                    }
                }
            }

            stall = if improved { 0 } else { stall + 1 };
            cost_history.push(best.objective());
        }

        tracing::debug!(
            rounds,
            moves,
            kicks,
            tabu_length = tabu.capacity(),
            objective = best.objective(),
            "reactive tabu finished"
        );
        *state = best;
        ReactiveTabuStats {
            rounds,
            moves,
            kicks,
            final_tabu_length: tabu.capacity(),
            cost_history,
        }
    }
}
