//! Areas and the read-only area registry.
//!
//! An [`AreaUnit`] is one atomic spatial unit (a census tract, a
//! municipality, a grid cell). The [`AreaManager`] owns all of them,
//! validates the contiguity graph once, and answers distance queries for
//! construction and search.

mod manager;
mod unit;

pub use manager::AreaManager;
pub use unit::AreaUnit;
