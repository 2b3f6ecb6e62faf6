//! Schema module - Configuration, input data and result types for clustering runs.

mod config;
mod dataset;
mod evolution;

pub use config::*;
pub use dataset::*;
pub use evolution::*;
