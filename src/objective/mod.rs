//! Distance and objective library.
//!
//! Distances between attribute vectors ([`DistanceKind`]), area-to-region
//! summaries ([`RegionStatistic`]) and the region heterogeneity measures
//! minimized by construction and search ([`ObjectiveKind`]). All of them
//! are closed enums chosen when a run is configured.

mod cache;
mod distance;
mod function;

pub use cache::ObjectiveCache;
pub use distance::{solution_similarity, DistanceKind, RegionStatistic};
pub use function::ObjectiveKind;
