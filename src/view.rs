//! Cursor-based lazy resampling view.

use std::{fmt, iter::FusedIterator, ops::Deref};

use rand::Rng;

use crate::{ParticleSet, error::InvalidWeights, walker::WeightDistribution};

/// An unbounded sequence of particles drawn with replacement, proportionally
/// to their weights.
///
/// The view owns its base collection (or borrows it, when built from a
/// reference) and the [`WeightDistribution`] snapshot taken at construction.
/// The random source stays owned by the caller and is mutably borrowed for
/// `'r`, so it cannot be dropped or used elsewhere while the view is alive.
///
/// The sequence has no end. Bound it with an adaptor:
///
/// ```rust
/// use resampling::sample;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut view = sample(vec![("a", 1.0), ("b", 3.0)], &mut rng).unwrap();
/// let states: Vec<&str> = view.iter().take(5).map(|p| p.0).collect();
/// assert_eq!(states.len(), 5);
/// ```
///
/// A view over a borrowed collection cannot outlive it:
///
/// ```rust,compile_fail
/// use resampling::sample;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut view = {
///     let particles = vec![(42, 1.0)];
///     sample(particles.as_slice(), &mut rng).unwrap()
/// };
/// view.iter().next();
/// ```
///
/// Nor can an iterator outlive a temporary view:
///
/// ```rust,compile_fail
/// use resampling::sample;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut iter = sample(vec![(42, 1.0)], &mut rng).unwrap().iter();
/// iter.next();
/// ```
///
/// Nor can the view outlive its random source:
///
/// ```rust,compile_fail
/// use resampling::sample;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut view = {
///     let mut rng = StdRng::seed_from_u64(7);
///     sample(vec![(42, 1.0)], &mut rng).unwrap()
/// };
/// view.iter().next();
/// ```
pub struct ResamplingView<'r, C, R: ?Sized> {
    base: C,
    dist: WeightDistribution,
    rng: &'r mut R,
}

impl<'r, C, R> ResamplingView<'r, C, R>
where
    C: ParticleSet,
    R: Rng + ?Sized,
{
    /// Take `base` and build its weight distribution. Nothing is drawn yet.
    ///
    /// # Errors
    /// Any [`InvalidWeights`] reported for the weights of `base`.
    pub fn new(base: C, rng: &'r mut R) -> Result<Self, InvalidWeights> {
        let dist = WeightDistribution::from_particles(base.particles())?;
        Ok(Self { base, dist, rng })
    }

    /// Start a cursor, drawing its first element immediately.
    ///
    /// The cursor holds the view mutably, so only one can be live at a time.
    pub fn cursor(&mut self) -> Cursor<'_, C::Item, R> {
        Cursor::new(self.base.particles(), &self.dist, self.rng)
    }

    /// Iterate the view. The first element is drawn here, the rest on demand.
    pub fn iter(&mut self) -> Iter<'_, C::Item, R> {
        Iter {
            cursor: self.cursor(),
            fresh: true,
        }
    }

    /// The base collection.
    pub fn base(&self) -> &[C::Item] {
        self.base.particles()
    }

    pub fn distribution(&self) -> &WeightDistribution {
        &self.dist
    }

    /// Give the base collection back, releasing the random source.
    pub fn into_base(self) -> C {
        self.base
    }
}

impl<'v, C, R> IntoIterator for &'v mut ResamplingView<'_, C, R>
where
    C: ParticleSet,
    R: Rng + ?Sized,
{
    type Item = &'v C::Item;
    type IntoIter = Iter<'v, C::Item, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<C: fmt::Debug, R: ?Sized> fmt::Debug for ResamplingView<'_, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResamplingView")
            .field("base", &self.base)
            .field("dist", &self.dist)
            .finish_non_exhaustive()
    }
}

/// A position in a [`ResamplingView`]: the most recently drawn element.
///
/// Reading does not draw; reading twice without advancing returns the same
/// element. Every [`advance`](Cursor::advance) draws exactly once from the
/// view's random source, which is never rewound. The cursor is deliberately
/// not `Clone`: copies would share one random source and silently disagree
/// about what comes next.
pub struct Cursor<'v, P, R: ?Sized> {
    particles: &'v [P],
    dist: &'v WeightDistribution,
    rng: &'v mut R,
    current: usize,
}

impl<'v, P, R: Rng + ?Sized> Cursor<'v, P, R> {
    fn new(particles: &'v [P], dist: &'v WeightDistribution, rng: &'v mut R) -> Self {
        let current = dist.draw(&mut *rng);
        Self {
            particles,
            dist,
            rng,
            current,
        }
    }

    /// The element the cursor points at.
    #[inline]
    pub fn get(&self) -> &'v P {
        let particles = self.particles;
        &particles[self.current]
    }

    /// Index of the current element in the base collection.
    #[inline]
    pub fn index(&self) -> usize {
        self.current
    }

    /// Draw a new element and return it.
    #[inline]
    pub fn advance(&mut self) -> &'v P {
        self.current = self.dist.draw(self.rng);
        self.get()
    }
}

impl<P, R: Rng + ?Sized> Deref for Cursor<'_, P, R> {
    type Target = P;

    fn deref(&self) -> &P {
        self.get()
    }
}

impl<P: fmt::Debug, R: ?Sized> fmt::Debug for Cursor<'_, P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("current", &self.current)
            .field("particle", &self.particles[self.current])
            .finish_non_exhaustive()
    }
}

/// Iterator over a [`ResamplingView`]. Never returns `None`.
#[derive(Debug)]
pub struct Iter<'v, P, R: ?Sized> {
    cursor: Cursor<'v, P, R>,
    fresh: bool,
}

impl<'v, P, R: Rng + ?Sized> Iterator for Iter<'v, P, R> {
    type Item = &'v P;

    #[inline]
    fn next(&mut self) -> Option<&'v P> {
        if std::mem::take(&mut self.fresh) {
            Some(self.cursor.get())
        } else {
            Some(self.cursor.advance())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<P, R: Rng + ?Sized> FusedIterator for Iter<'_, P, R> {}
