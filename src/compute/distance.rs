//! Geometry helpers shared by the scorer and the mutation operators.

use crate::schema::PointSet;

/// Euclidean distance between two feature vectors of equal length.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Componentwise mean of the selected points, or `None` when no point is selected.
pub fn centroid<I>(points: &PointSet, members: I) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = usize>,
{
    let mut sum = vec![0.0f64; points.dim()];
    let mut count = 0usize;

    for index in members {
        for (s, v) in sum.iter_mut().zip(points.point(index)) {
            *s += v;
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let inv = 1.0 / count as f64;
    for s in &mut sum {
        *s *= inv;
    }
    Some(sum)
}

/// Nearest point to `index`, excluding `index` itself.
///
/// Ties resolve to the lowest index. Returns `None` for a single-point set.
pub fn nearest_other(points: &PointSet, index: usize) -> Option<usize> {
    let sample = points.point(index);

    points
        .iter()
        .enumerate()
        .filter(|&(other, _)| other != index)
        .map(|(other, point)| (other, euclidean(sample, point)))
        .fold(None, |best: Option<(usize, f64)>, (other, dist)| match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((other, dist)),
        })
        .map(|(other, _)| other)
}
