//! Genetic Clustering - Unsupervised clustering by evolving label assignments.
//!
//! A population of label assignments (chromosomes) over a fixed point set is
//! evolved with elitism, uniform crossover and three geometry-aware mutation
//! operators, using the silhouette coefficient as fitness.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, input data and result types
//! - `compute`: Geometry, scoring and the genetic search
//!
//! # Example
//!
//! ```rust,no_run
//! use genetic_clustering::{ClusteringConfig, ClusteringEngine, Dataset};
//!
//! let dataset = Dataset::load("iris.data")?;
//! let config = ClusteringConfig::default();
//!
//! let mut engine = ClusteringEngine::new(
//!     config.clone(),
//!     dataset.point_set()?,
//!     dataset.alphabet(config.clusters),
//! )?;
//! let result = engine.run()?;
//!
//! println!("Best fitness after {} generations: {:.4}",
//!     result.stats.generations, result.best.fitness);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{ClusteringEngine, EvolutionError};
pub use compute::{ClusterScorer, Silhouette};
pub use schema::{ClusteringConfig, ClusteringResult, Dataset, LabelAlphabet, PointSet};
