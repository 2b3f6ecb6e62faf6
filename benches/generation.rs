//! Benchmarks for fitness scoring and the mutation engine.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use genetic_clustering::{
    ClusterScorer, Silhouette,
    compute::evolution::{Chromosome, mutate},
    schema::{LabelAlphabet, PointSet},
};

/// `n` points in `dim` dimensions scattered around three centers.
fn blobs(n: usize, dim: usize, rng: &mut StdRng) -> PointSet {
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let center = (i % 3) as f64 * 10.0;
            (0..dim).map(|_| center + rng.gen_range(-1.0..1.0)).collect()
        })
        .collect();
    PointSet::from_rows(&rows).unwrap()
}

fn bench_silhouette(c: &mut Criterion) {
    let mut group = c.benchmark_group("silhouette");
    let mut rng = StdRng::seed_from_u64(42);
    let alphabet = LabelAlphabet::with_count(3);

    for size in [50, 150, 500] {
        let points = blobs(size, 4, &mut rng);
        let chromosome = Chromosome::random(size, &alphabet, &mut rng);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| Silhouette.score(black_box(&points), black_box(chromosome.labels())));
        });
    }

    group.finish();
}

fn bench_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation");
    let mut rng = StdRng::seed_from_u64(7);
    let alphabet = LabelAlphabet::with_count(3);

    for size in [50, 150, 500] {
        let points = blobs(size, 4, &mut rng);
        let chromosome = Chromosome::random(size, &alphabet, &mut rng);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| mutate(black_box(&chromosome), &points, &alphabet, &mut rng));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_silhouette, bench_mutation);
criterion_main!(benches);
