//! Configuration types for genetic clustering runs.

use serde::{Deserialize, Serialize};

/// Upper bound on the parent selection pool when none is configured.
pub const DEFAULT_SELECTION_POOL: usize = 50;

/// Top-level configuration for a clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Population size, goal fitness and generation budget.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Elitism and parent selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Per-gene crossover rates.
    #[serde(default)]
    pub crossover: CrossoverConfig,
    /// Mutation settings.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Requested cluster count. When unset, the label alphabet is derived
    /// from the dataset's reference labels.
    #[serde(default)]
    pub clusters: Option<usize>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            population: PopulationConfig::default(),
            selection: SelectionConfig::default(),
            crossover: CrossoverConfig::default(),
            mutation: MutationConfig::default(),
            clusters: None,
            random_seed: None,
        }
    }
}

/// Population and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of individuals in every generation.
    #[serde(default = "default_size_population")]
    pub size_population: usize,
    /// Early-stop fitness threshold in [0, 1].
    #[serde(default = "default_goal")]
    pub goal: f64,
    /// Hard cap on bred generations.
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size_population: default_size_population(),
            goal: default_goal(),
            repeat: default_repeat(),
        }
    }
}

fn default_size_population() -> usize {
    50
}
fn default_goal() -> f64 {
    0.9
}
fn default_repeat() -> usize {
    100
}

/// Elitism and parent selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Fraction of the ranked population copied into the next generation.
    #[serde(default = "default_elite_fraction")]
    pub elite_fraction: f64,
    /// Number of top-ranked individuals parents are drawn from.
    /// Defaults to `min(50, size_population)`.
    #[serde(default)]
    pub pool_size: Option<usize>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            elite_fraction: default_elite_fraction(),
            pool_size: None,
        }
    }
}

fn default_elite_fraction() -> f64 {
    0.1
}

/// Per-gene crossover rates. The remainder `1 - self_rate - parent_rate`
/// is the chance of injecting a uniformly random label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CrossoverConfig {
    /// Probability a gene is taken from the first parent.
    #[serde(default = "default_self_rate")]
    pub self_rate: f64,
    /// Probability a gene is taken from the second parent.
    #[serde(default = "default_parent_rate")]
    pub parent_rate: f64,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            self_rate: default_self_rate(),
            parent_rate: default_parent_rate(),
        }
    }
}

impl CrossoverConfig {
    /// Probability of a random label injection per gene.
    #[inline]
    pub fn immigration_rate(&self) -> f64 {
        (1.0 - self.self_rate - self.parent_rate).max(0.0)
    }
}

fn default_self_rate() -> f64 {
    0.45
}
fn default_parent_rate() -> f64 {
    0.45
}

/// Mutation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Whether copied elites are mutated along with the offspring.
    /// Disabling this gives strict elitism.
    #[serde(default = "default_mutate_elites")]
    pub mutate_elites: bool,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mutate_elites: default_mutate_elites(),
        }
    }
}

fn default_mutate_elites() -> bool {
    true
}

impl ClusteringConfig {
    /// Number of individuals copied verbatim into each new generation.
    pub fn elite_count(&self) -> usize {
        // Nudge so products like 0.29 * 100 land on the intended integer.
        let exact = self.selection.elite_fraction * self.population.size_population as f64;
        ((exact + 1e-9).floor() as usize).min(self.population.size_population)
    }

    /// Size of the top-ranked pool parents are drawn from.
    pub fn selection_pool_size(&self) -> usize {
        self.selection
            .pool_size
            .unwrap_or_else(|| DEFAULT_SELECTION_POOL.min(self.population.size_population))
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.population.size_population;
        if size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.population.repeat == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if !(0.0..=1.0).contains(&self.population.goal) {
            return Err(ConfigError::InvalidGoal(self.population.goal));
        }
        if !(0.0..1.0).contains(&self.selection.elite_fraction) {
            return Err(ConfigError::InvalidEliteFraction(
                self.selection.elite_fraction,
            ));
        }

        let pool = self.selection_pool_size();
        if pool == 0 || pool > size {
            return Err(ConfigError::InvalidPoolSize { pool, size });
        }

        let CrossoverConfig {
            self_rate,
            parent_rate,
        } = self.crossover;
        if self_rate < 0.0 || parent_rate < 0.0 || self_rate + parent_rate > 1.0 {
            return Err(ConfigError::InvalidCrossoverRates {
                self_rate,
                parent_rate,
            });
        }

        if self.clusters == Some(0) {
            return Err(ConfigError::NoClusters);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be non-zero")]
    EmptyPopulation,
    #[error("Generation budget (repeat) must be non-zero")]
    NoGenerations,
    #[error("Goal fitness must lie in [0, 1], got {0}")]
    InvalidGoal(f64),
    #[error("Elite fraction must lie in [0, 1), got {0}")]
    InvalidEliteFraction(f64),
    #[error("Selection pool size {pool} must be between 1 and the population size {size}")]
    InvalidPoolSize { pool: usize, size: usize },
    #[error("Crossover rates must be non-negative and sum to at most 1 (self {self_rate}, parent {parent_rate})")]
    InvalidCrossoverRates { self_rate: f64, parent_rate: f64 },
    #[error("Requested cluster count must be non-zero")]
    NoClusters,
}
