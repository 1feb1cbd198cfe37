//! Initial partition construction.
//!
//! - **Exogenous**: a fixed number of regions grown from k-means++ seeds,
//!   or a supplied assignment replayed label by label.
//! - **Threshold**: regions grown until an extensive attribute reaches a
//!   minimum; leftover enclaves are absorbed afterwards (max-p).
//! - **Range**: regions grown while the spread of an attribute stays
//!   within a bound.
//!
//! All of them grow regions through the same candidate pool
//! `(area, region) → distance to centroid`, drained by a [`Selection`] rule.

mod endogenous;
mod exogenous;
mod grower;
mod seeds;
mod selection;

pub use endogenous::{absorb_enclaves, construct_range, grow_threshold_regions, ThresholdAttempt};
pub use exogenous::{construct_exogenous, ExogenousConfig};
pub use grower::Growth;
pub use selection::Selection;
