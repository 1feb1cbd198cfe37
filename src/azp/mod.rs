//! Automatic Zoning Procedure (AZP).
//!
//! Steepest-descent local search over single-area relocations between
//! adjacent regions, keeping every region contiguous.

mod config;
mod runner;

pub use config::AzpConfig;
pub use runner::{AzpRunner, AzpStats};

pub(crate) use runner::{can_leave, shuffled_regions};
