//! Population controller: ranking, elitism, reproduction and termination.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::compute::{ClusterScorer, ScoreError, Silhouette};
use crate::schema::{
    ClusteringConfig, ClusteringResult, ClusteringStats, ConfigError, EvolutionPhase,
    FitnessHistory, GenerationProgress, LabelAlphabet, PointSet, StopReason,
};

use super::chromosome::{Chromosome, Individual};
use super::crossover::crossover;
use super::mutation::mutate;

/// Errors that abort a clustering run.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Fitness evaluation failed: {0}")]
    Score(#[from] ScoreError),
    #[error("Label alphabet is empty")]
    EmptyAlphabet,
    #[error("{points} points cannot be clustered with {labels} labels; need a single point or more points than labels")]
    TooFewPoints { points: usize, labels: usize },
}

/// Genetic search over label assignments of a fixed point set.
///
/// The point set is shared read-only with every evaluation. All random draws
/// come from one seeded generator, so a fixed `random_seed` reproduces a run
/// even though fitness evaluation runs in parallel.
pub struct ClusteringEngine<S: ClusterScorer = Silhouette> {
    config: ClusteringConfig,
    points: Arc<PointSet>,
    alphabet: LabelAlphabet,
    scorer: S,
    rng: StdRng,
    seed: u64,
    population: Vec<Individual>,
    best: Option<(Individual, usize)>,
    history: FitnessHistory,
    generation: usize,
    evaluations: u64,
    phase: EvolutionPhase,
}

impl ClusteringEngine<Silhouette> {
    /// Create an engine scoring with the silhouette coefficient.
    pub fn new(
        config: ClusteringConfig,
        points: impl Into<Arc<PointSet>>,
        alphabet: LabelAlphabet,
    ) -> Result<Self, EvolutionError> {
        Self::with_scorer(config, points, alphabet, Silhouette)
    }
}

impl<S: ClusterScorer> ClusteringEngine<S> {
    /// Create an engine with a custom scorer.
    pub fn with_scorer(
        config: ClusteringConfig,
        points: impl Into<Arc<PointSet>>,
        alphabet: LabelAlphabet,
        scorer: S,
    ) -> Result<Self, EvolutionError> {
        config.validate()?;

        if alphabet.is_empty() {
            return Err(EvolutionError::EmptyAlphabet);
        }

        let points = points.into();
        if points.len() > 1 && points.len() <= alphabet.len() {
            return Err(EvolutionError::TooFewPoints {
                points: points.len(),
                labels: alphabet.len(),
            });
        }

        let seed = config.random_seed.unwrap_or_else(rand::random);
        log::debug!(
            "Clustering {} points of dimension {} into {} labels (seed {})",
            points.len(),
            points.dim(),
            alphabet.len(),
            seed
        );

        Ok(Self {
            config,
            points,
            alphabet,
            scorer,
            rng: StdRng::seed_from_u64(seed),
            seed,
            population: Vec::new(),
            best: None,
            history: FitnessHistory::default(),
            generation: 0,
            evaluations: 0,
            phase: EvolutionPhase::Initializing,
        })
    }

    /// Configuration of this run.
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// The point set being clustered.
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Labels available to every chromosome.
    pub fn alphabet(&self) -> &LabelAlphabet {
        &self.alphabet
    }

    /// Current population. Ranked best-first at the start of each generation.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Generations bred so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best and average fitness per bred generation.
    pub fn history(&self) -> &FitnessHistory {
        &self.history
    }

    /// Build the initial population from independent random chromosomes.
    pub fn initialize(&mut self) -> Result<(), EvolutionError> {
        self.generation = 0;
        self.history = FitnessHistory::default();
        self.best = None;
        self.phase = EvolutionPhase::Initializing;

        let chromosomes: Vec<Chromosome> = (0..self.config.population.size_population)
            .map(|_| Chromosome::random(self.points.len(), &self.alphabet, &mut self.rng))
            .collect();

        self.population = self.evaluate_all(chromosomes)?;
        self.track_best();
        self.phase = EvolutionPhase::Evolving;
        Ok(())
    }

    /// Evaluate chromosomes in parallel; the first scorer error wins.
    fn evaluate_all(&mut self, chromosomes: Vec<Chromosome>) -> Result<Vec<Individual>, ScoreError> {
        let points = self.points.as_ref();
        let scorer = &self.scorer;

        let individuals = chromosomes
            .into_par_iter()
            .map(|chromosome| Individual::evaluate(chromosome, points, scorer))
            .collect::<Result<Vec<_>, _>>()?;

        self.evaluations += individuals.len() as u64;
        Ok(individuals)
    }

    /// Sort the population best-first. Ties keep their current order.
    fn rank(&mut self) {
        self.population
            .sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    }

    /// Whether the ranked population's best fitness lies in [goal, 1].
    fn goal_reached(&self) -> bool {
        self.population
            .first()
            .is_some_and(|best| (self.config.population.goal..=1.0).contains(&best.fitness()))
    }

    /// Breed one generation from the ranked population.
    fn step_generation(&mut self) -> Result<(), EvolutionError> {
        let size = self.config.population.size_population;
        let elite_count = self.config.elite_count();
        let pool = self.config.selection_pool_size().min(self.population.len());
        let mutate_elites = self.config.mutation.mutate_elites;

        let mut next_gen: Vec<Chromosome> = Vec::with_capacity(size);

        // Elitism: carry the top slice over
        next_gen.extend(
            self.population[..elite_count]
                .iter()
                .map(|individual| individual.chromosome().clone()),
        );

        // Fill the rest with offspring of parents from the top-ranked pool
        while next_gen.len() < size {
            let lhs = self.rng.gen_range(0..pool);
            let rhs = self.rng.gen_range(0..pool);
            let child = crossover(
                self.population[lhs].chromosome(),
                self.population[rhs].chromosome(),
                &self.alphabet,
                &self.config.crossover,
                &mut self.rng,
            );
            next_gen.push(child);
        }

        // Mutation
        let start = if mutate_elites { 0 } else { elite_count };
        for chromosome in &mut next_gen[start..] {
            *chromosome = mutate(chromosome, &self.points, &self.alphabet, &mut self.rng);
        }

        self.population = self.evaluate_all(next_gen)?;
        self.generation += 1;

        let (best, avg) = self.fitness_summary();
        self.history.record(best, avg);
        self.track_best();

        log::debug!(
            "Generation {}: best fitness {:.4}, average {:.4}",
            self.generation,
            best,
            avg
        );
        Ok(())
    }

    /// Best and average fitness of the current population.
    fn fitness_summary(&self) -> (f64, f64) {
        let best = self
            .population
            .iter()
            .map(Individual::fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        let avg = if self.population.is_empty() {
            0.0
        } else {
            self.population.iter().map(Individual::fitness).sum::<f64>()
                / self.population.len() as f64
        };
        (best, avg)
    }

    fn current_best(&self) -> Option<&Individual> {
        self.population
            .iter()
            .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
    }

    /// Remember the best individual seen so far.
    fn track_best(&mut self) {
        let Some(candidate) = self.current_best() else {
            return;
        };
        let improved = self
            .best
            .as_ref()
            .is_none_or(|(best, _)| candidate.fitness() > best.fitness());
        if improved {
            self.best = Some((candidate.clone(), self.generation));
        }
    }

    /// Get current progress.
    pub fn progress(&self) -> GenerationProgress {
        let (best_fitness, avg_fitness) = self.fitness_summary();
        let best_labels = self
            .current_best()
            .map(|best| best.chromosome().labels().to_vec())
            .unwrap_or_default();

        GenerationProgress {
            generation: self.generation,
            total_generations: self.config.population.repeat,
            best_fitness,
            avg_fitness,
            best_labels,
            phase: self.phase,
        }
    }

    /// Run the search, reporting progress after initialization and after
    /// every generation.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<ClusteringResult, EvolutionError>
    where
        F: FnMut(&GenerationProgress),
    {
        let start_time = Instant::now();

        self.initialize()?;
        callback(&self.progress());

        let stop_reason = loop {
            self.rank();

            if self.goal_reached() {
                break StopReason::GoalReached;
            }
            if self.generation >= self.config.population.repeat {
                break StopReason::BudgetExhausted;
            }

            self.step_generation()?;
            callback(&self.progress());
        };

        self.phase = stop_reason.into();
        let elapsed = start_time.elapsed().as_secs_f64();
        let (final_best, final_avg) = self.fitness_summary();

        log::info!(
            "Stopped after {} generations ({:?}), best fitness {:.4}",
            self.generation,
            stop_reason,
            final_best
        );

        let (best, generation) = match &self.best {
            Some((best, generation)) => (best, *generation),
            None => return Err(EvolutionError::Config(ConfigError::EmptyPopulation)),
        };

        Ok(ClusteringResult {
            best: best.to_snapshot(generation),
            stats: ClusteringStats {
                generations: self.generation,
                total_evaluations: self.evaluations,
                best_fitness: best.fitness(),
                final_best_fitness: final_best,
                final_avg_fitness: final_avg,
                elapsed_seconds: elapsed,
                random_seed: self.seed,
                stop_reason,
            },
            history: self.history.clone(),
        })
    }

    /// Run the search (blocking).
    pub fn run(&mut self) -> Result<ClusteringResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PopulationConfig, SelectionConfig};

    fn two_triads() -> PointSet {
        PointSet::from_rows(&[
            [0.0, 0.0],
            [0.0, 1.0],
            [1.0, 0.0],
            [20.0, 20.0],
            [20.0, 21.0],
            [21.0, 20.0],
        ])
        .unwrap()
    }

    fn config(size: usize, goal: f64, repeat: usize, seed: u64) -> ClusteringConfig {
        ClusteringConfig {
            population: PopulationConfig {
                size_population: size,
                goal,
                repeat,
            },
            random_seed: Some(seed),
            ..Default::default()
        }
    }

    /// Scorer that never reaches any goal above zero.
    struct Flat;

    impl ClusterScorer for Flat {
        fn score(&self, _points: &PointSet, _labels: &[usize]) -> Result<f64, ScoreError> {
            Ok(0.0)
        }
    }

    /// Scorer that always fails.
    struct Broken;

    impl ClusterScorer for Broken {
        fn score(&self, points: &PointSet, labels: &[usize]) -> Result<f64, ScoreError> {
            Err(ScoreError::LengthMismatch {
                points: points.len(),
                labels: labels.len() + 1,
            })
        }
    }

    #[test]
    fn test_engine_creation() {
        let mut engine =
            ClusteringEngine::new(config(10, 0.9, 5, 1), two_triads(), LabelAlphabet::with_count(2))
                .unwrap();
        assert_eq!(engine.phase(), EvolutionPhase::Initializing);

        engine.initialize().unwrap();
        assert_eq!(engine.population().len(), 10);
        assert_eq!(engine.phase(), EvolutionPhase::Evolving);
        assert!(engine
            .population()
            .iter()
            .all(|individual| individual.chromosome().len() == 6));
    }

    #[test]
    fn test_population_size_is_invariant() {
        // 15 * 0.1 = 1 elite, 14 offspring.
        let mut engine = ClusteringEngine::with_scorer(
            config(15, 0.9, 8, 3),
            two_triads(),
            LabelAlphabet::with_count(3),
            Flat,
        )
        .unwrap();

        let mut generations = Vec::new();
        let result = engine
            .run_with_callback(|progress| generations.push(progress.generation))
            .unwrap();

        assert_eq!(engine.population().len(), 15);
        assert_eq!(generations, (0..=8).collect::<Vec<_>>());
        assert_eq!(result.stats.total_evaluations, 15 * 9);
    }

    #[test]
    fn test_budget_exhausted() {
        let mut engine = ClusteringEngine::with_scorer(
            config(6, 0.5, 7, 11),
            two_triads(),
            LabelAlphabet::with_count(2),
            Flat,
        )
        .unwrap();

        let result = engine.run().unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(result.stats.generations, 7);
        assert_eq!(result.history.len(), 7);
        assert_eq!(engine.phase(), EvolutionPhase::BudgetExhausted);
    }

    #[test]
    fn test_goal_zero_stops_before_breeding() {
        // Any non-degenerate individual scores 0.0 >= goal.
        let mut engine = ClusteringEngine::with_scorer(
            config(10, 0.0, 50, 2),
            two_triads(),
            LabelAlphabet::with_count(2),
            Flat,
        )
        .unwrap();

        let result = engine.run().unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::GoalReached);
        assert_eq!(result.stats.generations, 0);
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_stops_when_goal_first_reached() {
        let mut engine = ClusteringEngine::new(
            config(10, 0.9, 50, 5),
            two_triads(),
            LabelAlphabet::with_count(2),
        )
        .unwrap();

        let result = engine.run().unwrap();
        if result.stats.stop_reason == StopReason::GoalReached {
            // Every recorded generation except the last fell short of the goal.
            let history = &result.history.best_fitness;
            if let Some((last, earlier)) = history.split_last() {
                assert!(*last >= 0.9);
                assert!(earlier.iter().all(|&f| f < 0.9));
            }
        }
    }

    #[test]
    fn test_two_triads_are_separated() {
        let mut successes = 0;
        for seed in 0..10 {
            let mut engine = ClusteringEngine::new(
                config(10, 0.9, 50, seed),
                two_triads(),
                LabelAlphabet::with_count(2),
            )
            .unwrap();
            let result = engine.run().unwrap();

            if result.stats.stop_reason == StopReason::GoalReached {
                let labels = &result.best.labels;
                assert!(result.best.fitness >= 0.9);
                assert!(labels[..3].iter().all(|&l| l == labels[0]));
                assert!(labels[3..].iter().all(|&l| l == labels[3]));
                assert_ne!(labels[0], labels[3]);
                assert!(result.stats.generations <= 50);
                successes += 1;
            }
        }
        assert!(successes >= 7, "only {successes}/10 seeded runs separated the triads");
    }

    #[test]
    fn test_seed_reproduces_run() {
        let run = |seed| {
            let mut engine = ClusteringEngine::new(
                config(12, 0.99, 10, seed),
                two_triads(),
                LabelAlphabet::with_count(3),
            )
            .unwrap();
            engine.run().unwrap()
        };

        let a = run(17);
        let b = run(17);
        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
        assert_eq!(a.stats.random_seed, 17);
    }

    #[test]
    fn test_strict_elitism_keeps_best() {
        let mut engine = ClusteringEngine::new(
            ClusteringConfig {
                mutation: crate::schema::MutationConfig {
                    mutate_elites: false,
                },
                ..config(20, 1.0, 15, 8)
            },
            two_triads(),
            LabelAlphabet::with_count(2),
        )
        .unwrap();

        let result = engine.run().unwrap();
        let history = &result.history.best_fitness;
        assert!(history.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_elites_mutated_after_copy() {
        let elite_slot_changes = |mutate_elites: bool| {
            (0..20)
                .filter(|&seed| {
                    let mut engine = ClusteringEngine::with_scorer(
                        ClusteringConfig {
                            mutation: crate::schema::MutationConfig { mutate_elites },
                            ..config(10, 1.0, 5, seed)
                        },
                        two_triads(),
                        LabelAlphabet::with_count(2),
                        Flat,
                    )
                    .unwrap();
                    engine.initialize().unwrap();
                    engine.rank();

                    let elite = engine.population()[0].chromosome().clone();
                    engine.step_generation().unwrap();
                    // Slot 0 of the new generation holds the copied elite.
                    engine.population()[0].chromosome() != &elite
                })
                .count()
        };

        assert_eq!(elite_slot_changes(false), 0);
        let changed = elite_slot_changes(true);
        assert!(changed >= 10, "elite was mutated in only {changed}/20 runs");
    }

    #[test]
    fn test_overflowing_points_abort_run() {
        let points = PointSet::from_rows(&[[0.0], [1.0], [1e300], [-1e300]]).unwrap();
        let mut engine =
            ClusteringEngine::new(config(10, 0.9, 5, 6), points, LabelAlphabet::with_count(2))
                .unwrap();

        assert!(matches!(
            engine.run(),
            Err(EvolutionError::Score(ScoreError::NonFinite))
        ));
    }

    #[test]
    fn test_single_point_run() {
        let points = PointSet::from_rows(&[[3.0, 4.0]]).unwrap();
        let mut engine =
            ClusteringEngine::new(config(5, 0.9, 3, 0), points, LabelAlphabet::with_count(2))
                .unwrap();

        let result = engine.run().unwrap();
        assert_eq!(result.best.fitness, -1.0);
        assert_eq!(result.stats.stop_reason, StopReason::BudgetExhausted);
    }

    #[test]
    fn test_scorer_error_aborts_run() {
        let mut engine = ClusteringEngine::with_scorer(
            config(10, 0.9, 5, 4),
            two_triads(),
            LabelAlphabet::with_count(2),
            Broken,
        )
        .unwrap();

        assert!(matches!(engine.run(), Err(EvolutionError::Score(_))));
    }

    #[test]
    fn test_rejects_bad_setup() {
        let small_pool = ClusteringConfig {
            selection: SelectionConfig {
                pool_size: Some(0),
                ..Default::default()
            },
            ..config(10, 0.9, 5, 0)
        };
        assert!(matches!(
            ClusteringEngine::new(small_pool, two_triads(), LabelAlphabet::with_count(2)),
            Err(EvolutionError::Config(ConfigError::InvalidPoolSize { .. }))
        ));

        assert!(matches!(
            ClusteringEngine::new(config(10, 0.9, 5, 0), two_triads(), LabelAlphabet::with_count(0)),
            Err(EvolutionError::EmptyAlphabet)
        ));

        assert!(matches!(
            ClusteringEngine::new(config(10, 0.9, 5, 0), two_triads(), LabelAlphabet::with_count(6)),
            Err(EvolutionError::TooFewPoints { points: 6, labels: 6 })
        ));
    }
}
