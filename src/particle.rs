use std::{rc::Rc, sync::Arc};

/// A value pairing an opaque state with a non-negative weight.
///
/// Implemented for `(state, weight)` tuples, for [`ParticleRef`], and for any
/// struct with `state` and `weight` fields through `#[derive(Particle)]`.
pub trait Particle {
    type State;
    type Weight: Copy + Into<f64>;

    fn state(&self) -> &Self::State;
    fn weight(&self) -> Self::Weight;
}

/// A [`Particle`] whose state and weight can be rewritten in place.
///
/// The samplers never need this; it backs the filter steps in
/// [`propagate`](crate::propagate) and [`reweight`](crate::reweight).
pub trait ParticleMut: Particle {
    fn state_mut(&mut self) -> &mut Self::State;
    fn set_weight(&mut self, weight: Self::Weight);
}

impl<S, W: Copy + Into<f64>> Particle for (S, W) {
    type State = S;
    type Weight = W;

    #[inline]
    fn state(&self) -> &S {
        &self.0
    }
    #[inline]
    fn weight(&self) -> W {
        self.1
    }
}

impl<S, W: Copy + Into<f64>> ParticleMut for (S, W) {
    #[inline]
    fn state_mut(&mut self) -> &mut S {
        &mut self.0
    }
    #[inline]
    fn set_weight(&mut self, weight: W) {
        self.1 = weight;
    }
}

/// A particle assembled from a borrowed state and a borrowed weight.
///
/// Lets states and weights kept in separate arrays be resampled together
/// without copying (possibly large) states:
///
/// ```rust
/// use resampling::{ParticleRef, sample};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let states = vec![[0.0f64; 50], [1.0; 50]];
/// let weights = vec![0.0, 2.0];
/// let particles: Vec<_> = states
///     .iter()
///     .zip(&weights)
///     .map(|(s, w)| ParticleRef::new(s, w))
///     .collect();
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let picked: Vec<&[f64; 50]> = sample(particles, &mut rng)
///     .unwrap()
///     .iter()
///     .take(4)
///     .map(|p| p.state)
///     .collect();
/// assert!(picked.iter().all(|s| s[0] == 1.0));
/// ```
#[derive(Debug)]
pub struct ParticleRef<'a, S, W> {
    pub state: &'a S,
    pub weight: &'a W,
}

impl<'a, S, W> ParticleRef<'a, S, W> {
    pub const fn new(state: &'a S, weight: &'a W) -> Self {
        Self { state, weight }
    }
}

impl<S, W> Clone for ParticleRef<'_, S, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, W> Copy for ParticleRef<'_, S, W> {}

impl<S, W: Copy + Into<f64>> Particle for ParticleRef<'_, S, W> {
    type State = S;
    type Weight = W;

    #[inline]
    fn state(&self) -> &S {
        self.state
    }
    #[inline]
    fn weight(&self) -> W {
        *self.weight
    }
}

/// A random-access, fixed-size collection of particles.
///
/// Owned collections (`Vec`, arrays, boxed or shared slices) are moved into a
/// sampler; references borrow and tie the sampler to the collection's
/// lifetime.
pub trait ParticleSet {
    type Item: Particle;

    fn particles(&self) -> &[Self::Item];
}

impl<P: Particle> ParticleSet for [P] {
    type Item = P;

    #[inline]
    fn particles(&self) -> &[P] {
        self
    }
}

impl<P: Particle, const N: usize> ParticleSet for [P; N] {
    type Item = P;

    #[inline]
    fn particles(&self) -> &[P] {
        self
    }
}

impl<P: Particle> ParticleSet for Vec<P> {
    type Item = P;

    #[inline]
    fn particles(&self) -> &[P] {
        self
    }
}

impl<P: Particle> ParticleSet for Box<[P]> {
    type Item = P;

    #[inline]
    fn particles(&self) -> &[P] {
        self
    }
}

impl<P: Particle> ParticleSet for Rc<[P]> {
    type Item = P;

    #[inline]
    fn particles(&self) -> &[P] {
        self
    }
}

impl<P: Particle> ParticleSet for Arc<[P]> {
    type Item = P;

    #[inline]
    fn particles(&self) -> &[P] {
        self
    }
}

impl<T: ParticleSet + ?Sized> ParticleSet for &T {
    type Item = T::Item;

    #[inline]
    fn particles(&self) -> &[T::Item] {
        (**self).particles()
    }
}
