//! Cluster-quality scoring.
//!
//! The search treats the scorer as an opaque function of (points, labels);
//! [`Silhouette`] is the coefficient used by default.

use crate::schema::{Label, PointSet};

use super::distance::euclidean;

/// Scores a labeling of a point set. Higher is better, range [-1, 1].
pub trait ClusterScorer: Send + Sync {
    fn score(&self, points: &PointSet, labels: &[Label]) -> Result<f64, ScoreError>;
}

/// Mean silhouette coefficient over all points.
///
/// For point `i` with mean intra-cluster distance `a` and lowest mean distance
/// to another cluster `b`, `s(i) = (b - a) / max(a, b)`. Members of singleton
/// clusters contribute 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silhouette;

impl ClusterScorer for Silhouette {
    fn score(&self, points: &PointSet, labels: &[Label]) -> Result<f64, ScoreError> {
        let n = points.len();
        if n == 0 {
            return Err(ScoreError::EmptyPointSet);
        }
        if labels.len() != n {
            return Err(ScoreError::LengthMismatch {
                points: n,
                labels: labels.len(),
            });
        }

        let buckets = labels.iter().max().map_or(0, |&max| max + 1);
        let mut sizes = vec![0usize; buckets];
        for &label in labels {
            sizes[label] += 1;
        }

        let distinct = sizes.iter().filter(|&&size| size > 0).count();
        if distinct < 2 || distinct > n - 1 {
            return Err(ScoreError::InvalidLabelCount {
                distinct,
                points: n,
            });
        }

        let mut sums = vec![0.0f64; buckets];
        let mut total = 0.0f64;

        for i in 0..n {
            sums.fill(0.0);
            let sample = points.point(i);
            for (j, point) in points.iter().enumerate() {
                if j != i {
                    sums[labels[j]] += euclidean(sample, point);
                }
            }

            let own = labels[i];
            if sizes[own] <= 1 {
                continue;
            }

            let a = sums[own] / (sizes[own] - 1) as f64;
            let b = sums
                .iter()
                .zip(&sizes)
                .enumerate()
                .filter(|&(label, (_, &size))| label != own && size > 0)
                .map(|(_, (sum, &size))| sum / size as f64)
                .fold(f64::INFINITY, f64::min);

            let denom = a.max(b);
            if denom > 0.0 {
                total += (b - a) / denom;
            }
        }

        let score = total / n as f64;
        if !score.is_finite() {
            return Err(ScoreError::NonFinite);
        }
        Ok(score)
    }
}

/// Scoring errors. These indicate caller misuse and abort a run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("Cannot score an empty point set")]
    EmptyPointSet,
    #[error("Point set has {points} points but {labels} labels were given")]
    LengthMismatch { points: usize, labels: usize },
    #[error("Silhouette needs between 2 and n-1 distinct labels, got {distinct} for {points} points")]
    InvalidLabelCount { distinct: usize, points: usize },
    #[error("Silhouette is not finite; distances overflowed")]
    NonFinite,
}
