//! Tabu search execution engine.
//!
//! # Algorithm
//!
//! 1. Build the move catalogue: border area × adjacent region, with the
//!    source region keeping more than one member and staying connected
//! 2. Pick the best (exact) or a random (random) admissible move: not tabu,
//!    or tabu but beating the best objective found (aspiration)
//! 3. Apply it and forbid the reverse move for `tabu_length` rounds
//! 4. Stop after `conv_tabu` consecutive rounds without a new best and
//!    restore the best partition
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! Ricca, F. & Simeone, B. (2008). "Local search algorithms for political
//! districting", *European Journal of Operational Research* 189(3), 1409-1426.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::{default_conv_tabu, TabuConfig, TabuSelection};
use super::list::TabuList;
use crate::area::AreaManager;
use crate::construction::{construct_exogenous, Selection};
use crate::error::Result;
use crate::partition::{Move, MoveConstraint, PartitionState, IMPROVEMENT_EPS};
use crate::report::{Algorithm, RegionalizationResult};
use crate::rng::rng_for;

/// Outcome of a tabu search.
#[derive(Debug, Clone, PartialEq)]
pub struct TabuStats {
    /// Rounds executed.
    pub rounds: usize,
    /// Moves applied.
    pub moves: usize,
    /// Round at which the best partition was found (0 = the start).
    pub best_round: usize,
    /// Best objective after each round.
    pub cost_history: Vec<f64>,
}

/// Parameters of one tabu search over an existing partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabuSearch {
    pub tabu_length: usize,
    pub conv_tabu: usize,
    pub selection: TabuSelection,
    pub constraint: MoveConstraint,
}

impl TabuSearch {
    pub fn new(tabu_length: usize, conv_tabu: usize) -> Self {
        Self {
            tabu_length,
            conv_tabu,
            selection: TabuSelection::Exact,
            constraint: MoveConstraint::Contiguity,
        }
    }

    pub fn with_selection(mut self, selection: TabuSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_constraint(mut self, constraint: MoveConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Runs the search on `state` and leaves it at the best partition seen.
    pub fn improve<R: Rng>(&self, state: &mut PartitionState<'_>, rng: &mut R) -> TabuStats {
        let mut best = state.clone();
        let mut tabu = TabuList::new(self.tabu_length);
        let mut stall = 0;
        let mut rounds = 0;
        let mut moves = 0;
        let mut best_round = 0;
        let mut cost_history = Vec::new();

        while stall < self.conv_tabu {
            let aspiration = best.objective();
            let chosen = match self.selection {
                TabuSelection::Exact => self.best_admissible(state, &tabu, aspiration),
                TabuSelection::Random => self.random_admissible(state, &tabu, aspiration, rng),
            };
            rounds += 1;

            match chosen {
                Choice::Converged => {
                    tracing::debug!(round = rounds, "no feasible move left");
                    break;
                }
                Choice::AllTabu => {
                    tabu.age();
                    stall += 1;
                }
                Choice::Move(mv) => {
                    tabu.push(mv.area, mv.from);
                    state.apply_move(mv.area, mv.to);
                    moves += 1;
                    if aspiration - state.objective() > IMPROVEMENT_EPS {
                        best = state.clone();
                        best_round = rounds;
                        stall = 0;
                    } else {
                        stall += 1;
                    }
                }
            }
            cost_history.push(best.objective());
        }

        tracing::debug!(
            rounds,
            moves,
            best_round,
            objective = best.objective(),
            "tabu search finished"
        );
        *state = best;
        TabuStats {
            rounds,
            moves,
            best_round,
            cost_history,
        }
    }

    fn best_admissible(
        &self,
        state: &PartitionState<'_>,
        tabu: &TabuList,
        aspiration: f64,
    ) -> Choice {
        let mut catalogue = state.feasible_moves(self.constraint);
        if catalogue.is_empty() {
            return Choice::Converged;
        }
        catalogue.sort_by(|a, b| {
            a.objective
                .total_cmp(&b.objective)
                .then(a.area.cmp(&b.area))
                .then(a.to.cmp(&b.to))
        });
        catalogue
            .into_iter()
            .find(|mv| admissible(mv, tabu, aspiration))
            .map_or(Choice::AllTabu, Choice::Move)
    }

    fn random_admissible<R: Rng>(
        &self,
        state: &PartitionState<'_>,
        tabu: &TabuList,
        aspiration: f64,
        rng: &mut R,
    ) -> Choice {
        let mut catalogue = state.possible_moves();
        catalogue.shuffle(rng);
        let mut any_feasible = false;
        for (area, to) in catalogue {
            if !state.is_move_allowed(area, to, self.constraint) {
                continue;
            }
            any_feasible = true;
            let mv = Move {
                area,
                from: state.region_of(area),
                to,
                objective: state.move_objective(area, to),
            };
            if admissible(&mv, tabu, aspiration) {
                return Choice::Move(mv);
            }
        }
        if any_feasible {
            Choice::AllTabu
        } else {
            Choice::Converged
        }
    }
}

enum Choice {
    Move(Move),
    AllTabu,
    Converged,
}

fn admissible(mv: &Move, tabu: &TabuList, aspiration: f64) -> bool {
    !tabu.contains(mv.area, mv.to) || aspiration - mv.objective > IMPROVEMENT_EPS
}

/// Executes AZP-Tabu.
pub struct TabuRunner;

impl TabuRunner {
    /// Constructs an initial partition and improves it by tabu search.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_regionalize::area::AreaManager;
    /// use u_regionalize::objective::DistanceKind;
    /// use u_regionalize::tabu::{TabuConfig, TabuRunner};
    ///
    /// let am = AreaManager::from_lists(
    ///     vec![vec![1], vec![0, 2], vec![1, 3], vec![2]],
    ///     vec![vec![0.0], vec![0.5], vec![7.0], vec![7.5]],
    ///     DistanceKind::EuclideanSquared,
    /// )
    /// .unwrap();
    /// let result = TabuRunner::run(&am, &TabuConfig::new(2).with_seed(4)).unwrap();
    /// assert!(result.objective <= result.initial_objective);
    /// ```
    pub fn run(manager: &AreaManager, config: &TabuConfig) -> Result<RegionalizationResult> {
        config.validate()?;
        let started = Instant::now();
        let mut rng = rng_for(config.seed);
        tracing::info!(
            algorithm = Algorithm::AzpTabu.name(),
            areas = manager.len(),
            regions = config.regions,
            tabu_length = config.tabu_length,
            "regionalization started"
        );

        let mut state = construct_exogenous(manager, &config.construction(), &mut rng)?;
        let initial = state.objective();
        let conv_tabu = config
            .conv_tabu
            .unwrap_or_else(|| default_conv_tabu(manager.len(), state.active_regions()));
        let stats = TabuSearch::new(config.tabu_length, conv_tabu)
            .with_selection(config.selection)
            .improve(&mut state, &mut rng);

        Ok(RegionalizationResult::from_state(
            &state,
            Algorithm::AzpTabu,
            initial,
            started.elapsed(),
            Selection::Minimum,
            stats.cost_history,
        ))
    }
}
