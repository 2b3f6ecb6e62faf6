//! Chromosomes and evaluated individuals.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::compute::{ClusterScorer, ScoreError};
use crate::schema::{IndividualSnapshot, Label, LabelAlphabet, PointSet};

/// Fitness assigned to chromosomes using fewer than two distinct labels.
pub const DEGENERATE_FITNESS: f64 = -1.0;

/// A complete label assignment: entry `i` is the label of point `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    labels: Vec<Label>,
}

impl Chromosome {
    /// Wrap an existing label assignment.
    pub fn new(labels: Vec<Label>) -> Self {
        Self { labels }
    }

    /// Assign every point a uniformly random label from the alphabet.
    pub fn random<R: Rng + ?Sized>(len: usize, alphabet: &LabelAlphabet, rng: &mut R) -> Self {
        let k = alphabet.len();
        let labels = (0..len)
            .map(|_| if k == 0 { 0 } else { rng.gen_range(0..k) })
            .collect();
        Self { labels }
    }

    /// Number of genes (points).
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True for a chromosome over an empty point set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of point `index`.
    #[inline]
    pub fn label(&self, index: usize) -> Label {
        self.labels[index]
    }

    /// All labels in point order.
    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Consume into the raw label vector.
    pub fn into_labels(self) -> Vec<Label> {
        self.labels
    }

    /// Number of points carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    /// Indices of the points carrying `label`, in index order.
    pub fn members(&self, label: Label) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |&(_, &l)| l == label)
            .map(|(index, _)| index)
    }

    /// Number of distinct labels in use.
    pub fn distinct_labels(&self) -> usize {
        let mut seen: Vec<Label> = self.labels.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

/// A chromosome plus its fitness, computed once at construction.
#[derive(Debug, Clone)]
pub struct Individual {
    chromosome: Chromosome,
    fitness: f64,
}

impl Individual {
    /// Score a chromosome.
    ///
    /// Chromosomes with fewer than two distinct labels get [`DEGENERATE_FITNESS`]
    /// without consulting the scorer.
    pub fn evaluate<S: ClusterScorer + ?Sized>(
        chromosome: Chromosome,
        points: &PointSet,
        scorer: &S,
    ) -> Result<Self, ScoreError> {
        let fitness = if chromosome.distinct_labels() < 2 {
            DEGENERATE_FITNESS
        } else {
            scorer.score(points, chromosome.labels())?
        };

        Ok(Self {
            chromosome,
            fitness,
        })
    }

    #[inline]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[inline]
    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    pub fn into_chromosome(self) -> Chromosome {
        self.chromosome
    }

    /// Convert to snapshot for serialization.
    pub fn to_snapshot(&self, generation: usize) -> IndividualSnapshot {
        IndividualSnapshot {
            labels: self.chromosome.labels.clone(),
            fitness: self.fitness,
            generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Silhouette;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_chromosome() {
        let mut rng = StdRng::seed_from_u64(42);
        let alphabet = LabelAlphabet::with_count(3);
        let chromosome = Chromosome::random(100, &alphabet, &mut rng);

        assert_eq!(chromosome.len(), 100);
        assert!(chromosome.labels().iter().all(|&l| l < 3));
        // 100 draws over 3 labels use all of them with overwhelming probability.
        assert_eq!(chromosome.distinct_labels(), 3);
    }

    #[test]
    fn test_members_and_count() {
        let chromosome = Chromosome::new(vec![1, 0, 1, 2, 1]);
        assert_eq!(chromosome.count(1), 3);
        assert_eq!(chromosome.members(1).collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(chromosome.members(5).count(), 0);
        assert_eq!(chromosome.distinct_labels(), 3);
    }

    #[test]
    fn test_degenerate_fitness() {
        let points = PointSet::from_rows(&[[0.0], [1.0], [2.0]]).unwrap();
        let individual = Individual::evaluate(Chromosome::new(vec![2, 2, 2]), &points, &Silhouette)
            .unwrap();
        assert_eq!(individual.fitness(), DEGENERATE_FITNESS);
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let points = PointSet::from_rows(&[[4.0, 2.0]]).unwrap();
        let individual =
            Individual::evaluate(Chromosome::new(vec![0]), &points, &Silhouette).unwrap();
        assert_eq!(individual.fitness(), DEGENERATE_FITNESS);
    }

    #[test]
    fn test_scored_fitness() {
        let points = PointSet::from_rows(&[[0.0], [1.0], [10.0], [11.0]]).unwrap();
        let individual =
            Individual::evaluate(Chromosome::new(vec![0, 0, 1, 1]), &points, &Silhouette)
                .unwrap();
        assert!(individual.fitness() > 0.85);

        let snapshot = individual.to_snapshot(4);
        assert_eq!(snapshot.labels, vec![0, 0, 1, 1]);
        assert_eq!(snapshot.generation, 4);
    }

    #[test]
    fn test_scorer_error_propagates() {
        let points = PointSet::from_rows(&[[0.0], [1.0], [10.0]]).unwrap();
        let err = Individual::evaluate(Chromosome::new(vec![0, 1]), &points, &Silhouette)
            .unwrap_err();
        assert!(matches!(err, ScoreError::LengthMismatch { .. }));
    }
}
