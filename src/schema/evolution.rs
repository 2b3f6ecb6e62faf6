//! Progress, history and result types for clustering runs.
//!
//! These are plain serializable values handed to progress callbacks and
//! written out for reporting and plotting.

use serde::{Deserialize, Serialize};

use super::Label;

/// Progress update emitted after initialization and after every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationProgress {
    /// Generations bred so far (0 right after initialization).
    pub generation: usize,
    /// Generation budget.
    pub total_generations: usize,
    /// Best fitness in the current population.
    pub best_fitness: f64,
    /// Average fitness of the current population.
    pub avg_fitness: f64,
    /// Label assignment of the current best individual.
    pub best_labels: Vec<Label>,
    /// Current phase of the run.
    pub phase: EvolutionPhase,
}

/// Snapshot of an individual for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualSnapshot {
    /// Label per point, in point index order.
    pub labels: Vec<Label>,
    /// Fitness score.
    pub fitness: f64,
    /// Generation the individual was observed in.
    pub generation: usize,
}

/// Fitness history for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FitnessHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f64>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
}

impl FitnessHistory {
    /// Append one generation's statistics.
    pub fn record(&mut self, best: f64, avg: f64) {
        self.best_fitness.push(best);
        self.avg_fitness.push(avg);
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness.is_empty()
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Building the random initial population.
    #[default]
    Initializing,
    /// Breeding generations.
    Evolving,
    /// Best fitness entered [goal, 1].
    GoalReached,
    /// Generation budget used up.
    BudgetExhausted,
}

/// Final result of a clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Best individual observed during the run.
    pub best: IndividualSnapshot,
    /// Statistics from the run.
    pub stats: ClusteringStats,
    /// Per-generation fitness history.
    pub history: FitnessHistory,
}

/// Statistics from a clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringStats {
    /// Generations bred.
    pub generations: usize,
    /// Total fitness evaluations performed.
    pub total_evaluations: u64,
    /// Best fitness observed.
    pub best_fitness: f64,
    /// Best fitness in the final population.
    pub final_best_fitness: f64,
    /// Average fitness of the final population.
    pub final_avg_fitness: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Seed the run's random generator was built from.
    pub random_seed: u64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason a run stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Best fitness reached the goal.
    GoalReached,
    /// Ran `repeat` generations without reaching the goal.
    BudgetExhausted,
}

impl From<StopReason> for EvolutionPhase {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::GoalReached => Self::GoalReached,
            StopReason::BudgetExhausted => Self::BudgetExhausted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_record() {
        let mut history = FitnessHistory::default();
        assert!(history.is_empty());

        history.record(0.5, 0.1);
        history.record(0.7, 0.3);
        assert_eq!(history.len(), 2);
        assert_eq!(history.best_fitness, vec![0.5, 0.7]);
        assert_eq!(history.avg_fitness, vec![0.1, 0.3]);
    }

    #[test]
    fn test_stop_reason_phase() {
        assert_eq!(
            EvolutionPhase::from(StopReason::GoalReached),
            EvolutionPhase::GoalReached
        );
        assert_eq!(
            EvolutionPhase::from(StopReason::BudgetExhausted),
            EvolutionPhase::BudgetExhausted
        );
    }

    #[test]
    fn test_serialization() {
        let result = ClusteringResult {
            best: IndividualSnapshot {
                labels: vec![0, 1, 1],
                fitness: 0.8,
                generation: 3,
            },
            stats: ClusteringStats {
                generations: 3,
                total_evaluations: 40,
                best_fitness: 0.8,
                final_best_fitness: 0.75,
                final_avg_fitness: 0.2,
                elapsed_seconds: 0.01,
                random_seed: 7,
                stop_reason: StopReason::BudgetExhausted,
            },
            history: FitnessHistory::default(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ClusteringResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.best, result.best);
        assert_eq!(parsed.stats.stop_reason, StopReason::BudgetExhausted);
    }
}
