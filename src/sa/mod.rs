//! AZP with simulated annealing (AZP-SA).
//!
//! Same move generation as AZP, but non-improving relocations are accepted
//! with a probability that shrinks as the temperature cools, allowing the
//! search to escape local optima. The best partition seen is returned.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Openshaw & Rao (1995), "Algorithms for reengineering 1991 census
//!   geography", *Environment and Planning A* 27(3), 425-446.

mod config;
mod runner;

pub use config::AzpSaConfig;
pub use runner::{AzpSaRunner, AzpSaStats};
