use rand::Rng;

use crate::{ParticleSet, ResamplingView, SampleGenerator, error::InvalidWeights};

/// A resampling stage waiting for its collection.
///
/// Captures the random source now; the particles arrive later through
/// [`apply`](Self::apply) or [`SampleExt::sample_by`]. Built by
/// [`sampler`](crate::sampler).
#[derive(Debug)]
pub struct ResamplingClosure<'r, R: ?Sized> {
    rng: &'r mut R,
}

impl<'r, R: Rng + ?Sized> ResamplingClosure<'r, R> {
    pub fn new(rng: &'r mut R) -> Self {
        Self { rng }
    }

    /// Build a [`ResamplingView`] over `particles`.
    ///
    /// # Errors
    /// Any [`InvalidWeights`] reported for the weights of `particles`.
    pub fn apply<C: ParticleSet>(
        self,
        particles: C,
    ) -> Result<ResamplingView<'r, C, R>, InvalidWeights> {
        ResamplingView::new(particles, self.rng)
    }

    /// Build a [`SampleGenerator`] over `particles` instead of a view.
    ///
    /// # Errors
    /// Any [`InvalidWeights`] reported for the weights of `particles`.
    pub fn generator<C: ParticleSet>(
        self,
        particles: C,
    ) -> Result<SampleGenerator<'r, C, R>, InvalidWeights> {
        SampleGenerator::new(particles, self.rng)
    }

    /// A shorter-lived closure over the same random source, so this one can
    /// be applied again once the borrowed one is done.
    pub fn reborrow(&mut self) -> ResamplingClosure<'_, R> {
        ResamplingClosure { rng: &mut *self.rng }
    }
}

/// Fluent application of a [`ResamplingClosure`] to any [`ParticleSet`].
///
/// ```rust
/// use resampling::{SampleExt, sampler};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(9);
/// let input = [(5, 1.0)];
/// let states: Vec<i32> = input
///     .sample_by(sampler(&mut rng))
///     .unwrap()
///     .iter()
///     .take(20)
///     .map(|p| p.0)
///     .collect();
/// assert_eq!(states, vec![5; 20]);
/// ```
pub trait SampleExt: ParticleSet + Sized {
    /// # Errors
    /// Any [`InvalidWeights`] reported for the weights of `self`.
    fn sample_by<'r, R: Rng + ?Sized>(
        self,
        closure: ResamplingClosure<'r, R>,
    ) -> Result<ResamplingView<'r, Self, R>, InvalidWeights> {
        closure.apply(self)
    }
}

impl<C: ParticleSet> SampleExt for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingRng;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn deferred_application() {
        let mut rng = CountingRng::new(StdRng::seed_from_u64(4));
        {
            let closure = ResamplingClosure::new(&mut rng);
            let mut view = closure.apply(vec![(1, 1.0), (2, 1.0)]).unwrap();
            assert_eq!(view.iter().take(10).count(), 10);
        }
        assert_eq!(rng.draws(), 10);
    }

    #[test]
    fn reborrow_applies_repeatedly() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut closure = ResamplingClosure::new(&mut rng);

        let first = closure.reborrow().apply([("a", 1.0)]).unwrap().iter().next().copied();
        let second: Vec<_> = closure
            .reborrow()
            .generator(vec![("b", 2.0)])
            .unwrap()
            .take(2)
            .collect();
        let third = closure.apply(&[("c", 3.0)]).unwrap().iter().next().copied();

        assert_eq!(first, Some(("a", 1.0)));
        assert_eq!(second, vec![("b", 2.0), ("b", 2.0)]);
        assert_eq!(third, Some(("c", 3.0)));
    }

    #[test]
    fn transformed_input_is_owned_by_the_view() {
        let mut rng = StdRng::seed_from_u64(8);
        let input = [(42, 1.0)];
        let mut view = input
            .iter()
            .map(|&(s, w)| (s + 1, w))
            .collect::<Vec<_>>()
            .sample_by(ResamplingClosure::new(&mut rng))
            .unwrap();
        assert!(view.iter().take(10).all(|p| p.0 == 43));
    }

    #[test]
    fn invalid_weights_surface_from_apply() {
        let mut rng = rand::rng();
        let result = [(1, -1.0), (2, 2.0), (3, 3.0)].sample_by(ResamplingClosure::new(&mut rng));
        assert!(matches!(result, Err(InvalidWeights::Negative { index: 0, .. })));
    }
}
