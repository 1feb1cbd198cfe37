//! Error types.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RegionError>;

/// Errors reported before or around a regionalization run.
///
/// Local search itself never fails: an empty move catalogue means
/// convergence. Construction exhaustion in the endogenous modes is a
/// value ([`Growth::Exhausted`](crate::construction::Growth)), not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    /// Neighbor lists reference missing ids, have gaps, or are asymmetric.
    #[error("malformed contiguity graph: {0}")]
    MalformedGraph(String),

    /// Attribute vectors are missing, empty, ragged or non-finite.
    #[error("malformed attributes: {0}")]
    MalformedAttributes(String),

    /// An endogenous construction was requested on areas without a
    /// threshold variable.
    #[error("areas carry no threshold variable")]
    MissingThreshold,

    /// The requested number of regions cannot be built on this graph.
    #[error("infeasible request: {0}")]
    InfeasibleRequest(String),

    /// A supplied initial assignment is not a valid contiguous partition.
    #[error("infeasible initial solution: {0}")]
    InfeasibleInitialSolution(String),

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A relocation that would break the partition invariants.
    #[error("invalid move of area {area} from region {from} to region {to}: {reason}")]
    InvalidMove {
        area: usize,
        from: usize,
        to: usize,
        reason: &'static str,
    },
}
