//! Compute module - Geometry, scoring and the genetic search.

mod distance;
mod silhouette;

pub mod evolution;

pub use distance::*;
pub use silhouette::*;
