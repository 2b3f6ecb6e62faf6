//! Genetic search over cluster label assignments.
//!
//! # Overview
//!
//! - **Chromosomes** (`chromosome`): label-per-point assignments and their
//!   evaluated fitness
//! - **Mutation** (`mutation`): three geometry-aware operators applied in a
//!   fixed order
//! - **Crossover** (`crossover`): uniform per-gene mixing with random label
//!   immigration
//! - **Search** (`search`): the population controller
//! - **Export** (`export`): saving results and fitness history
//!
//! # Example
//!
//! ```rust,no_run
//! use genetic_clustering::compute::evolution::ClusteringEngine;
//! use genetic_clustering::schema::{ClusteringConfig, LabelAlphabet, PointSet};
//!
//! let points = PointSet::from_rows(&[
//!     [0.0, 0.0], [0.0, 1.0], [1.0, 0.0],
//!     [9.0, 9.0], [9.0, 10.0], [10.0, 9.0],
//! ])?;
//!
//! let mut engine = ClusteringEngine::new(
//!     ClusteringConfig::default(),
//!     points,
//!     LabelAlphabet::with_count(2),
//! )?;
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best fitness = {:.3}",
//!         progress.generation, progress.best_fitness);
//! })?;
//!
//! println!("Best labels: {:?}", result.best.labels);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chromosome;
mod crossover;
mod export;
mod mutation;
mod search;

pub use chromosome::{Chromosome, DEGENERATE_FITNESS, Individual};
pub use crossover::crossover;
pub use export::{ClusteringExport, save_history};
pub use mutation::{
    copy_nearest_label, flip_random_label, migrate_cluster, migrate_to_nearest_cluster, mutate,
};
pub use search::{ClusteringEngine, EvolutionError};
