//! Spatially constrained clustering (regionalization).
//!
//! Aggregates N areas, each with an attribute vector and a set of
//! contiguous neighbors, into regions that are connected in the
//! contiguity graph and internally homogeneous:
//!
//! - **Construction**: fixed-P growth from k-means++ seeds
//!   ([`construction::construct_exogenous`]) and threshold or range
//!   growth where the number of regions follows from the data.
//! - **AZP**: steepest-descent relocation of border areas.
//! - **AZP-SA**: AZP with simulated annealing acceptance.
//! - **AZP-Tabu**: tabu search over the relocation catalogue, with exact or
//!   random move selection, plus a reactive variant that adapts its
//!   tabu length to cycling.
//! - **ARiSeL**: several constructions (in parallel with rayon) followed by
//!   tabu search on the best.
//! - **Max-p**: the most regions meeting a threshold, then tabu search
//!   that keeps every region above it.
//! - **Random**: an unoptimized random partition, for comparison.
//!
//! # Architecture
//!
//! [`area::AreaManager`] is an immutable registry shared by reference.
//! Each run owns one [`partition::PartitionState`] that keeps both the
//! region-to-areas and area-to-region maps consistent through a single
//! relocation routine. Every algorithm exposes a `*Config` with builder
//! methods and a `*Runner::run` returning a [`RegionalizationResult`].
//!
//! # Example
//!
//! ```
//! use u_regionalize::area::AreaManager;
//! use u_regionalize::azp::{AzpConfig, AzpRunner};
//! use u_regionalize::objective::DistanceKind;
//!
//! // 2x3 rook grid: left column low, right column high
//! let am = AreaManager::from_lists(
//!     vec![vec![1, 3], vec![0, 2, 4], vec![1, 5], vec![0, 4], vec![1, 3, 5], vec![2, 4]],
//!     vec![vec![1.0], vec![1.0], vec![9.0], vec![1.0], vec![1.0], vec![9.0]],
//!     DistanceKind::EuclideanSquared,
//! )
//! .unwrap();
//! let result = AzpRunner::run(&am, &AzpConfig::new(2).with_seed(7)).unwrap();
//! assert_eq!(result.regions, 2);
//! assert!(am.check_feasibility(&result.r2a));
//! ```

pub mod area;
pub mod arisel;
pub mod azp;
pub mod construction;
pub mod error;
pub mod maxp;
pub mod objective;
pub mod partition;
pub mod random;
pub mod report;
pub mod rng;
pub mod sa;
pub mod tabu;

pub use error::{RegionError, Result};
pub use report::{Algorithm, RegionalizationResult};
