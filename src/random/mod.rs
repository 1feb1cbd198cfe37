//! Random-construction baseline.
//!
//! A partition grown with [`Selection::FullRandom`](crate::construction::Selection)
//! and reported as is. Useful as a reference point for the heuristics.

mod config;
mod runner;

pub use config::RandomConfig;
pub use runner::RandomRunner;
