//! ARiSeL: multi-start construction followed by tabu search.
//!
//! The constructions are independent and share only the read-only
//! [`AreaManager`](crate::area::AreaManager), so they run in parallel with
//! rayon when the `parallel` feature is enabled. Each worker draws from its
//! own sub-seeded stream, so results do not depend on scheduling.

mod config;
mod runner;

pub use config::AriselConfig;
pub use runner::AriselRunner;
