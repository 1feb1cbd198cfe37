//! The mutable partition and its contiguity oracle.
//!
//! A [`PartitionState`] is produced by a construction, mutated in place by
//! local search through single-area relocations, and finally read out as
//! an assignment vector and objective value.

mod connectivity;
mod moves;
mod state;

pub use moves::{Move, MoveConstraint, IMPROVEMENT_EPS};
pub use state::PartitionState;

pub(crate) use state::group_labels;
