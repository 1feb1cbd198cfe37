//! Move catalogue shared by the local searches.

use super::PartitionState;

/// Minimum objective decrease that counts as an improvement.
pub const IMPROVEMENT_EPS: f64 = 1e-10;

/// Extra acceptance rule applied on top of contiguity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MoveConstraint {
    /// Only contiguity (and non-emptiness) of the source region.
    #[default]
    Contiguity,
    /// Both regions must keep a threshold total of at least this value.
    MinThreshold(f64),
}

/// A relocation of one area together with the objective it leads to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub area: usize,
    pub from: usize,
    pub to: usize,
    pub objective: f64,
}

impl PartitionState<'_> {
    /// Every (border area, adjacent region) pair whose source region has
    /// more than one member. Contiguity is not checked.
    pub fn possible_moves(&self) -> Vec<(usize, usize)> {
        let mut moves = Vec::new();
        for area in 0..self.assignment().len() {
            let from = self.region_of(area);
            if self.is_locked(from) || self.region_size(from) < 2 {
                continue;
            }
            for &to in self.frontier(area) {
                if !self.is_locked(to) {
                    moves.push((area, to));
                }
            }
        }
        moves
    }

    /// Whether moving `area` to `to` keeps the partition feasible.
    pub fn is_move_allowed(&self, area: usize, to: usize, constraint: MoveConstraint) -> bool {
        let from = self.region_of(area);
        if from == to || self.is_locked(from) || self.is_locked(to) {
            return false;
        }
        if self.region_size(from) < 2 || !self.frontier(area).contains(&to) {
            return false;
        }
        if let MoveConstraint::MinThreshold(threshold) = constraint {
            let value = self.manager().threshold_value(area);
            if self.region_threshold(from) - value < threshold
                || self.region_threshold(to) + value < threshold
            {
                return false;
            }
        }
        self.is_feasible_removal(from, area)
    }

    /// All allowed moves with their resulting objective.
    pub fn feasible_moves(&self, constraint: MoveConstraint) -> Vec<Move> {
        self.possible_moves()
            .into_iter()
            .filter(|&(area, to)| self.is_move_allowed(area, to, constraint))
            .map(|(area, to)| Move {
                area,
                from: self.region_of(area),
                to,
                objective: self.move_objective(area, to),
            })
            .collect()
    }
}
