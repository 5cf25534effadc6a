//! Walker's Alias Method for O(1) sampling from a discrete distribution.

use crate::{Particle, error::InvalidWeights};
use rand::Rng;

/// A frozen discrete distribution over the indices `0..n`.
///
/// Built once from a snapshot of `n` weights; index `i` is drawn with
/// probability `w_i / Σw_j`. Nothing is renormalized after construction.
#[derive(Debug, Clone)]
pub struct WeightDistribution {
    prob: Vec<f64>,
    alias: Vec<usize>,
    normalized: Vec<f64>,
    total: f64,
}

impl WeightDistribution {
    /// Construct an alias table from non-negative weights. O(n).
    ///
    /// # Errors
    /// * [`InvalidWeights::Empty`] if there are no weights.
    /// * [`InvalidWeights::NonFinite`] if any weight is `NaN` or infinite.
    /// * [`InvalidWeights::Negative`] if any weight is negative.
    /// * [`InvalidWeights::ZeroSum`] if the weights sum to zero.
    pub fn new(weights: &[f64]) -> Result<Self, InvalidWeights> {
        Self::build(weights).inspect_err(|err| {
            log::debug!("rejected {} weights: {err}", weights.len());
        })
    }

    /// Snapshot the weights of `particles` and build from them.
    ///
    /// # Errors
    /// See [`WeightDistribution::new`].
    pub fn from_particles<P: Particle>(particles: &[P]) -> Result<Self, InvalidWeights> {
        let weights: Vec<f64> = particles.iter().map(|p| p.weight().into()).collect();
        Self::new(&weights)
    }

    fn build(weights: &[f64]) -> Result<Self, InvalidWeights> {
        let n = weights.len();
        if n == 0 {
            return Err(InvalidWeights::Empty);
        }

        let mut max = 0.0f64;
        let mut zeros = 0usize;
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() {
                return Err(InvalidWeights::NonFinite { index, value });
            }
            if value < 0.0 {
                return Err(InvalidWeights::Negative { index, value });
            }
            if value == 0.0 {
                zeros += 1;
            }
            max = max.max(value);
        }
        if max == 0.0 {
            return Err(InvalidWeights::ZeroSum);
        }

        // Relative to the largest weight, so the sum stays within `1..=n`
        // even when the raw weights would overflow it.
        let relative: Vec<f64> = weights.iter().map(|&w| w / max).collect();
        let relative_sum: f64 = relative.iter().sum();
        let normalized: Vec<f64> = relative.iter().map(|&r| r / relative_sum).collect();
        let sum: f64 = weights.iter().sum();

        // Scale so average is 1.
        let mut scaled: Vec<f64> = normalized.iter().map(|&p| p * n as f64).collect();

        let mut prob = vec![0.0f64; n];
        let mut alias = (0..n).collect::<Vec<_>>();

        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);

        for (i, &p) in scaled.iter().enumerate() {
            if p < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        while let (Some(&s), Some(&l)) = (small.last(), large.last()) {
            small.pop();
            large.pop();

            prob[s] = scaled[s]; // in [0,1)
            alias[s] = l;

            scaled[l] = (scaled[l] + scaled[s]) - 1.0;

            if scaled[l] < 1.0 - 1e-15 {
                small.push(l);
            } else {
                large.push(l);
            }
        }

        // Whatever is left is within rounding error of a full bucket.
        for i in small.into_iter().chain(large) {
            prob[i] = 1.0;
            alias[i] = i;
        }

        log::debug!("built weight distribution over {n} entries (total weight {sum}, {zeros} zero)");

        Ok(Self {
            prob,
            alias,
            normalized,
            total: sum,
        })
    }

    /// Draw a single index in O(1).
    ///
    /// Consumes exactly one `u64` from `rng`: the integer part of `u * n`
    /// picks the bucket, the fractional part decides between the bucket and
    /// its alias.
    #[inline]
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let n = self.prob.len();
        let u = rng.random::<f64>() * n as f64;
        let i = (u as usize).min(n - 1);
        let frac = u - i as f64;
        if frac < self.prob[i] { i } else { self.alias[i] }
    }

    /// Draw k samples, returning counts per index (useful for checks).
    #[cfg(test)]
    pub fn draw_counts<R: Rng + ?Sized>(&self, rng: &mut R, draws: usize) -> Vec<usize> {
        let mut counts = vec![0usize; self.prob.len()];
        for _ in 0..draws {
            counts[self.draw(rng)] += 1;
        }
        counts
    }

    /// Probability of drawing `index`, or `None` if it is out of range.
    pub fn probability(&self, index: usize) -> Option<f64> {
        self.normalized.get(index).copied()
    }

    /// Sum of the snapshot weights. May be infinite for huge weights; the
    /// probabilities are unaffected.
    pub fn total_weight(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.prob.len()
    }
    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }
}
