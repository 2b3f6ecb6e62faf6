//! Quick clustering performance test on synthetic blobs

use genetic_clustering::{
    ClusteringEngine,
    schema::{ClusteringConfig, LabelAlphabet, PointSet, PopulationConfig},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

fn blobs(per_blob: usize, centers: &[(f64, f64)], rng: &mut StdRng) -> PointSet {
    let rows: Vec<[f64; 2]> = centers
        .iter()
        .flat_map(|&(cx, cy)| {
            (0..per_blob)
                .map(|_| [cx + rng.gen_range(-1.0..1.0), cy + rng.gen_range(-1.0..1.0)])
                .collect::<Vec<_>>()
        })
        .collect();
    PointSet::from_rows(&rows).unwrap()
}

fn main() {
    println!("=== Genetic Clustering Performance Test ===\n");

    let mut rng = StdRng::seed_from_u64(42);

    // Test different dataset sizes
    for per_blob in [3, 10, 30] {
        let points = blobs(per_blob, &[(0.0, 0.0), (10.0, 10.0)], &mut rng);
        println!("Points: {} (2 blobs)", points.len());

        let config = ClusteringConfig {
            population: PopulationConfig {
                size_population: 20,
                goal: 0.8,
                repeat: 100,
            },
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = ClusteringEngine::new(config, points, LabelAlphabet::with_count(2)).unwrap();
        let result = engine.run().unwrap();
        let elapsed = start.elapsed();

        println!("  Stop reason:    {:?}", result.stats.stop_reason);
        println!("  Generations:    {}", result.stats.generations);
        println!("  Evaluations:    {}", result.stats.total_evaluations);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Best fitness:   {:.4}", result.best.fitness);
        println!();
    }

    println!("=== Scalability Test (fixed 3 x 20 points) ===\n");

    let points = blobs(20, &[(0.0, 0.0), (10.0, 0.0), (5.0, 9.0)], &mut rng);

    // Test different population sizes
    for pop_size in [10, 20, 40, 80] {
        let config = ClusteringConfig {
            population: PopulationConfig {
                size_population: pop_size,
                goal: 1.0,
                repeat: 20,
            },
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine =
            ClusteringEngine::new(config, points.clone(), LabelAlphabet::with_count(3)).unwrap();
        let result = engine.run().unwrap();
        let elapsed = start.elapsed();

        println!(
            "Population {}: {} evals in {:.2}s, best fitness {:.4}",
            pop_size,
            result.stats.total_evaluations,
            elapsed.as_secs_f64(),
            result.best.fitness
        );
    }
}
