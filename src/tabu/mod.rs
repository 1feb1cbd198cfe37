//! Tabu search over AZP moves (AZP-Tabu) and its reactive variant.
//!
//! Short-term memory (the tabu list) forbids recently reversed relocations,
//! preventing cycling and letting the search walk through non-improving
//! partitions. [`TabuSearch`] is the shared engine; ARiSeL and max-p reuse
//! it on their own constructions.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Openshaw, S. & Rao, L. (1995). "Algorithms for reengineering 1991
//!   census geography", *Environment and Planning A* 27(3), 425-446.

mod config;
mod list;
mod reactive;
mod runner;

pub use config::{ReactiveTabuConfig, TabuConfig, TabuSelection};
pub use list::TabuList;
pub use reactive::{ReactiveTabuRunner, ReactiveTabuStats};
pub use runner::{TabuRunner, TabuSearch, TabuStats};

pub(crate) use config::default_conv_tabu;
