//! Genetic Clustering CLI - Cluster a tabular dataset from a JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;

use genetic_clustering::{
    ClusteringConfig, ClusteringEngine, Dataset,
    compute::evolution::{ClusteringExport, save_history},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <dataset> [config.json] [result.json]", args[0]);
        eprintln!();
        eprintln!("Cluster a dataset by evolving label assignments.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  dataset      CSV rows (features..., label) or JSON {{points, labels}}");
        eprintln!("  config.json  Path to clustering configuration (default settings if omitted)");
        eprintln!("  result.json  Where to write the result; the fitness history is written");
        eprintln!("               next to it as <result>.history.json");
        eprintln!();
        eprintln!("Example configuration is printed with the --example flag.");
        std::process::exit(1);
    }

    let dataset = Dataset::load(&args[1]).unwrap_or_else(|e| {
        eprintln!("Error loading dataset: {}", e);
        std::process::exit(1);
    });

    // Load configuration
    let config: ClusteringConfig = match args.get(2) {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => ClusteringConfig::default(),
    };

    let points = dataset.point_set().unwrap_or_else(|e| {
        eprintln!("Error building point set: {}", e);
        std::process::exit(1);
    });
    let alphabet = dataset.alphabet(config.clusters);

    println!("Genetic Clustering");
    println!("==================");
    println!("Points: {} ({} features)", points.len(), points.dim());
    println!("Labels: {}", alphabet.names().join(", "));
    println!("Population: {}", config.population.size_population);
    println!("Goal: {}", config.population.goal);
    println!("Generations: {}", config.population.repeat);
    println!();

    let mut engine = ClusteringEngine::new(config.clone(), points, alphabet.clone())
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let result = engine
        .run_with_callback(|progress| {
            let labels: Vec<String> = progress.best_labels.iter().map(|l| l.to_string()).collect();
            println!(
                "  Generation {}/{}: best={:.6}, avg={:.6}, labels=[{}]",
                progress.generation,
                progress.total_generations,
                progress.best_fitness,
                progress.avg_fitness,
                labels.join(" ")
            );
        })
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    println!();
    println!("Result:");
    println!("  Stop reason: {:?}", result.stats.stop_reason);
    println!("  Generations: {}", result.stats.generations);
    println!("  Best fitness: {:.6}", result.best.fitness);
    println!("  Evaluations: {}", result.stats.total_evaluations);
    println!("  Seed: {}", result.stats.random_seed);
    println!(
        "  Time: {:.2}s ({:.1} evaluations/s)",
        result.stats.elapsed_seconds,
        result.stats.total_evaluations as f64 / result.stats.elapsed_seconds.max(1e-9)
    );

    if let Some(path) = args.get(3) {
        let result_path = PathBuf::from(path);
        let history_path = result_path.with_extension("history.json");

        if let Err(e) = save_history(&result.history, &history_path) {
            eprintln!("Error writing fitness history: {}", e);
            std::process::exit(1);
        }

        let export = ClusteringExport::new(&config, &alphabet, result);
        if let Err(e) = export.save(&result_path) {
            eprintln!("Error writing result: {}", e);
            std::process::exit(1);
        }

        println!();
        println!("Wrote {} and {}", result_path.display(), history_path.display());
    }
}

fn print_example_config() {
    let config = ClusteringConfig::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
