//! Pull-style resampling generator.

use std::{fmt, iter::FusedIterator};

use rand::Rng;

use crate::{ParticleSet, error::InvalidWeights, walker::WeightDistribution};

/// Where the generator stands between two requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing requested yet.
    Pending,
    /// Suspended right after yielding this index.
    Yielded(usize),
}

/// A single-consumer producer of resampled particles.
///
/// Draws the same way a [`ResamplingView`](crate::ResamplingView) does, but
/// lazily: construction draws nothing, and each [`resume`](Self::resume)
/// draws exactly once. There is no cursor to split off, so the only way to
/// move forward is to ask the generator itself.
///
/// ```rust
/// use resampling::sample_generator;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let picked: Vec<(char, f32)> = sample_generator(['a', 'b'].map(|c| (c, 1.0f32)), &mut rng)
///     .unwrap()
///     .take(3)
///     .collect();
/// assert_eq!(picked.len(), 3);
/// ```
pub struct SampleGenerator<'r, C, R: ?Sized> {
    base: C,
    dist: WeightDistribution,
    rng: &'r mut R,
    state: State,
}

impl<'r, C, R> SampleGenerator<'r, C, R>
where
    C: ParticleSet,
    R: Rng + ?Sized,
{
    /// # Errors
    /// Any [`InvalidWeights`] reported for the weights of `base`.
    pub fn new(base: C, rng: &'r mut R) -> Result<Self, InvalidWeights> {
        let dist = WeightDistribution::from_particles(base.particles())?;
        Ok(Self {
            base,
            dist,
            rng,
            state: State::Pending,
        })
    }

    /// Draw the next particle and return a reference to it.
    pub fn resume(&mut self) -> &C::Item {
        let index = self.dist.draw(self.rng);
        self.state = State::Yielded(index);
        &self.base.particles()[index]
    }

    /// The particle yielded by the last [`resume`](Self::resume), if any.
    pub fn current(&self) -> Option<&C::Item> {
        match self.state {
            State::Pending => None,
            State::Yielded(index) => Some(&self.base.particles()[index]),
        }
    }

    pub fn distribution(&self) -> &WeightDistribution {
        &self.dist
    }

    pub fn into_base(self) -> C {
        self.base
    }
}

/// Yields owned copies. Never returns `None`.
impl<C, R> Iterator for SampleGenerator<'_, C, R>
where
    C: ParticleSet,
    C::Item: Clone,
    R: Rng + ?Sized,
{
    type Item = C::Item;

    #[inline]
    fn next(&mut self) -> Option<C::Item> {
        Some(self.resume().clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<C, R> FusedIterator for SampleGenerator<'_, C, R>
where
    C: ParticleSet,
    C::Item: Clone,
    R: Rng + ?Sized,
{
}

impl<C: fmt::Debug, R: ?Sized> fmt::Debug for SampleGenerator<'_, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleGenerator")
            .field("base", &self.base)
            .field("dist", &self.dist)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ResamplingView, testing::CountingRng};
    use rand::{SeedableRng, rngs::StdRng};

    fn particle_set() -> Vec<(u32, f64)> {
        vec![(1, 1.0), (2, 0.0), (3, 3.0), (4, 0.0), (5, 5.0)]
    }

    #[test]
    fn converges_to_weights() {
        let mut rng = StdRng::seed_from_u64(0xc0ffee);
        let generator = SampleGenerator::new(particle_set(), &mut rng).unwrap();

        let n = 40_000;
        let mut counts = [0usize; 6];
        for (state, _) in generator.take(n) {
            counts[state as usize] += 1;
        }
        let expected = [0.0, 1.0 / 9.0, 0.0, 3.0 / 9.0, 0.0, 5.0 / 9.0];
        for state in 1..=5 {
            let freq = counts[state] as f64 / n as f64;
            let tolerance = if expected[state] == 0.0 { 0.01 } else { 0.03 };
            assert!(
                (freq - expected[state]).abs() < tolerance,
                "state={state} freq={freq}"
            );
        }
    }

    #[test]
    fn draws_on_demand() {
        let mut rng = CountingRng::new(StdRng::seed_from_u64(1));
        {
            let mut generator = SampleGenerator::new(particle_set(), &mut rng).unwrap();
            assert!(generator.current().is_none());

            let first = *generator.resume();
            assert_eq!(generator.current(), Some(&first));
            assert_eq!(generator.current(), Some(&first));

            generator.resume();
            generator.resume();
        }
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn single_element() {
        let mut rng = rand::rng();
        let input = [(5, 1.0)];
        let generator = SampleGenerator::new(&input, &mut rng).unwrap();
        assert!(generator.take(20).all(|p| p.0 == 5));
    }

    #[test]
    fn matches_view_for_equal_seeds() {
        let mut view_rng = StdRng::seed_from_u64(77);
        let mut gen_rng = StdRng::seed_from_u64(77);

        let mut view = ResamplingView::new(particle_set(), &mut view_rng).unwrap();
        let generator = SampleGenerator::new(particle_set(), &mut gen_rng).unwrap();

        let from_view: Vec<_> = view.iter().take(500).copied().collect();
        let from_generator: Vec<_> = generator.take(500).collect();
        assert_eq!(from_view, from_generator);
    }

    #[test]
    fn rejects_invalid_weights() {
        let mut rng = rand::rng();
        let particles = vec![("a", 0.0), ("b", 0.0)];
        assert_eq!(
            SampleGenerator::new(particles, &mut rng).unwrap_err(),
            InvalidWeights::ZeroSum
        );
    }
}
