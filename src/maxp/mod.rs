//! Max-p regionalization with tabu refinement.
//!
//! The number of regions is not given: it is the largest count for which
//! every region reaches a minimum total on the threshold variable. Among
//! partitions with that count, tabu search minimizes heterogeneity while
//! keeping every region above the threshold.

mod config;
mod runner;

pub use config::MaxpConfig;
pub use runner::MaxpRunner;
