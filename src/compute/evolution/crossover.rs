//! Uniform per-gene crossover with random label immigration.

use rand::Rng;

use crate::schema::{CrossoverConfig, LabelAlphabet};

use super::chromosome::Chromosome;

/// Produce a child from two parents of equal length.
///
/// For every gene independently: with probability `self_rate` the child takes
/// `lhs`'s label, with probability `parent_rate` it takes `rhs`'s label, and
/// otherwise it takes a uniformly random label from the alphabet.
pub fn crossover<R: Rng + ?Sized>(
    lhs: &Chromosome,
    rhs: &Chromosome,
    alphabet: &LabelAlphabet,
    rates: &CrossoverConfig,
    rng: &mut R,
) -> Chromosome {
    debug_assert_eq!(lhs.len(), rhs.len(), "parents must cover the same points");

    let inherit = rates.self_rate + rates.parent_rate;
    let labels = lhs
        .labels()
        .iter()
        .zip(rhs.labels())
        .map(|(&own, &other)| {
            let p: f64 = rng.r#gen();
            if p < rates.self_rate {
                own
            } else if p < inherit || alphabet.is_empty() {
                other
            } else {
                rng.gen_range(0..alphabet.len())
            }
        })
        .collect();

    Chromosome::new(labels)
}
