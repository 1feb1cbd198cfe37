//! Seeded random sources.
//!
//! Every construction and search takes an explicit `&mut impl Rng`; the
//! runners create it here from their configured seed.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// A reproducible generator for `seed`.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A generator for an optional seed; `None` draws a fresh one.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    create_rng(seed.unwrap_or_else(rand::random))
}
