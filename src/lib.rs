//! # resampling
//!
//! Lazy weighted resampling for particle filters.
//!
//! Given a finite collection of particles, each carrying a state and a
//! non-negative weight, this crate produces an unbounded sequence of particles
//! drawn with replacement, each with probability proportional to its weight.
//! The weights are snapshotted once into a
//! [Walker alias table](https://en.wikipedia.org/wiki/Alias_method), so every
//! draw is O(1) and consumes exactly one `u64` from the random source.
//!
//! There are two ways to pull from the sequence:
//!
//! 1. **Views** with [`sample`]: a [`ResamplingView`] hands out a [`Cursor`]
//!    (or an [`Iter`]) whose first element is drawn eagerly.
//! 2. **Generators** with [`sample_generator`]: a [`SampleGenerator`] draws
//!    only when asked for the next value.
//!
//! Both produce the same sequence from the same seed. Neither ever ends, so
//! bound them with `take`.
//!
//! ## Quick start
//!
//! ```rust
//! use rand::{SeedableRng, rngs::StdRng};
//! use resampling::{Particle, sample};
//!
//! #[derive(Clone, Debug, Particle)]
//! struct Hypothesis {
//!     state: f64,
//!     weight: f64,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let particles = vec![
//!     Hypothesis { state: -1.0, weight: 1.0 },
//!     Hypothesis { state: 0.0, weight: 0.0 },
//!     Hypothesis { state: 1.0, weight: 3.0 },
//! ];
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let next: Vec<Hypothesis> = sample(particles, &mut rng)?.iter().take(100).cloned().collect();
//! assert_eq!(next.len(), 100);
//! assert!(next.iter().all(|p| p.state != 0.0));
//! # Ok(()) }
//! ```
//!
//! ## Pipelines
//!
//! [`sampler`] captures the random source up front and takes the particles
//! later, which fits the collection into a method chain through
//! [`SampleExt::sample_by`].
//!
//! ## Gotchas
//! * Weights must be **non-negative** and not all zero; `NaN`/∞ are rejected
//!   with [`InvalidWeights`]. There is no silent fallback to uniform odds.
//! * The weights are read once. Changing them means building a new view.
//! * A view or generator mutably borrows the random source for its whole
//!   life, and a cursor mutably borrows its view. Use-after-free of either,
//!   and cursors that disagree about the next draw, do not compile.
//!
//! ## Logging
//! Distribution builds and rejections are reported at `debug` level through
//! the [`log`](https://docs.rs/log) facade; install any logger to see them.

// Lets `#[derive(Particle)]` expand to `::resampling::...` inside this crate.
extern crate self as resampling;

mod closure;
mod error;
mod filter;
mod generator;
mod particle;
mod view;
mod walker;

#[cfg(test)]
mod testing;

pub use closure::{ResamplingClosure, SampleExt};
pub use error::InvalidWeights;
pub use filter::{propagate, resample, reweight, total_weight};
pub use generator::SampleGenerator;
pub use particle::{Particle, ParticleMut, ParticleRef, ParticleSet};
pub use view::{Cursor, Iter, ResamplingView};
pub use walker::WeightDistribution;

/// Derive macro imported from `resampling_macros`.
/// See the crate-level example for usage.
#[cfg(feature = "derive")]
pub use resampling_macros::Particle;

use rand::Rng;

/// Resample `particles` lazily, drawing from `rng`.
///
/// # Errors
/// See [`WeightDistribution::new`]: empty input, negative or non-finite
/// weights and zero total weight are rejected.
pub fn sample<C, R>(particles: C, rng: &mut R) -> Result<ResamplingView<'_, C, R>, InvalidWeights>
where
    C: ParticleSet,
    R: Rng + ?Sized,
{
    ResamplingView::new(particles, rng)
}

/// Capture `rng` now and resample whatever collection is supplied later.
pub fn sampler<R: Rng + ?Sized>(rng: &mut R) -> ResamplingClosure<'_, R> {
    ResamplingClosure::new(rng)
}

/// Resample `particles` through a pull generator, drawing from `rng` only on
/// request.
///
/// # Errors
/// Same as [`sample`].
pub fn sample_generator<C, R>(
    particles: C,
    rng: &mut R,
) -> Result<SampleGenerator<'_, C, R>, InvalidWeights>
where
    C: ParticleSet,
    R: Rng + ?Sized,
{
    SampleGenerator::new(particles, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn smoke_pairs() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut view = sample(vec![("a", 1.0), ("b", 3.0)], &mut rng).unwrap();
        let drawn = view.iter().next().copied();
        assert!(matches!(drawn, Some(("a", 1.0) | ("b", 3.0))), "drawn={drawn:?}");
    }

    #[test]
    fn entry_points_agree() {
        let particles = [(1, 1.0), (2, 0.0), (3, 3.0), (4, 0.0), (5, 5.0)];

        let mut rng = StdRng::seed_from_u64(99);
        let a: Vec<i32> = sample(&particles, &mut rng)
            .unwrap()
            .iter()
            .take(64)
            .map(|p| p.0)
            .collect();

        let mut rng = StdRng::seed_from_u64(99);
        let b: Vec<i32> = sampler(&mut rng)
            .apply(&particles)
            .unwrap()
            .iter()
            .take(64)
            .map(|p| p.0)
            .collect();

        let mut rng = StdRng::seed_from_u64(99);
        let c: Vec<i32> = sample_generator(&particles, &mut rng)
            .unwrap()
            .take(64)
            .map(|p| p.0)
            .collect();

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(!a.contains(&2) && !a.contains(&4));
    }
}
