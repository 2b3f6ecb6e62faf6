//! Geometry-aware mutation operators.
//!
//! Each operator is a pure function from a chromosome to a new chromosome.
//! [`mutate`] composes them in a fixed order:
//!
//! 1. [`migrate_to_nearest_cluster`]: a third of one cluster moves to the
//!    cluster with the nearest centroid.
//! 2. [`flip_random_label`]: one point gets a different random label.
//! 3. [`copy_nearest_label`]: one point takes its nearest neighbour's label.

use rand::Rng;

use crate::compute::{centroid, euclidean, nearest_other};
use crate::schema::{Label, LabelAlphabet, PointSet};

use super::chromosome::Chromosome;

/// Apply all three operators in order.
pub fn mutate<R: Rng + ?Sized>(
    chromosome: &Chromosome,
    points: &PointSet,
    alphabet: &LabelAlphabet,
    rng: &mut R,
) -> Chromosome {
    let migrated = migrate_to_nearest_cluster(chromosome, points, alphabet, rng);
    let flipped = flip_random_label(&migrated, points, alphabet, rng);
    copy_nearest_label(&flipped, points, alphabet, rng)
}

/// Pick a random source label and migrate part of its cluster.
///
/// See [`migrate_cluster`].
pub fn migrate_to_nearest_cluster<R: Rng + ?Sized>(
    chromosome: &Chromosome,
    points: &PointSet,
    alphabet: &LabelAlphabet,
    rng: &mut R,
) -> Chromosome {
    if alphabet.is_empty() {
        return chromosome.clone();
    }
    let source = rng.gen_range(0..alphabet.len());
    migrate_cluster(chromosome, points, alphabet, source)
}

/// Move `floor(count / 3)` points labelled `source` to the label whose
/// centroid lies closest to the source centroid.
///
/// Points are taken in index order. Labels with no members have no centroid
/// and are skipped, unless the source is the only populated cluster: then the
/// lowest other label receives the points. Nothing changes when the source
/// cluster has fewer than three members or the alphabet has a single label.
pub fn migrate_cluster(
    chromosome: &Chromosome,
    points: &PointSet,
    alphabet: &LabelAlphabet,
    source: Label,
) -> Chromosome {
    let members: Vec<usize> = chromosome.members(source).collect();
    let quota = members.len() / 3;
    if quota == 0 {
        return chromosome.clone();
    }

    let Some(source_center) = centroid(points, members.iter().copied()) else {
        return chromosome.clone();
    };

    let target = (0..alphabet.len())
        .filter(|&label| label != source)
        .filter_map(|label| {
            centroid(points, chromosome.members(label))
                .map(|center| (label, euclidean(&center, &source_center)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, _)| label)
        .or_else(|| (0..alphabet.len()).find(|&label| label != source));

    let Some(target) = target else {
        return chromosome.clone();
    };

    let mut labels = chromosome.labels().to_vec();
    for &index in &members[..quota] {
        labels[index] = target;
    }
    Chromosome::new(labels)
}

/// Overwrite one random point's label with a different random label.
///
/// No-op when the alphabet has fewer than two labels.
pub fn flip_random_label<R: Rng + ?Sized>(
    chromosome: &Chromosome,
    _points: &PointSet,
    alphabet: &LabelAlphabet,
    rng: &mut R,
) -> Chromosome {
    let k = alphabet.len();
    if k < 2 || chromosome.is_empty() {
        return chromosome.clone();
    }

    let index = rng.gen_range(0..chromosome.len());
    let current = chromosome.label(index);

    // Uniform over the other k - 1 labels.
    let mut label = rng.gen_range(0..k - 1);
    if label >= current {
        label += 1;
    }

    let mut labels = chromosome.labels().to_vec();
    labels[index] = label;
    Chromosome::new(labels)
}

/// Give one random point the label of its nearest other point.
///
/// No-op for single-point sets.
pub fn copy_nearest_label<R: Rng + ?Sized>(
    chromosome: &Chromosome,
    points: &PointSet,
    _alphabet: &LabelAlphabet,
    rng: &mut R,
) -> Chromosome {
    if chromosome.is_empty() {
        return chromosome.clone();
    }

    let index = rng.gen_range(0..chromosome.len());
    match nearest_other(points, index) {
        Some(nearest) => {
            let mut labels = chromosome.labels().to_vec();
            labels[index] = chromosome.label(nearest);
            Chromosome::new(labels)
        }
        None => chromosome.clone(),
    }
}
