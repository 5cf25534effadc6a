//! The steps of a bootstrap particle filter built around the samplers.

use rand::Rng;

use crate::{Particle, ParticleMut, ParticleSet, ResamplingView, error::InvalidWeights};

/// Replace every state with `f(&state)`. Weights are left alone.
pub fn propagate<P, F>(particles: &mut [P], mut f: F)
where
    P: ParticleMut,
    F: FnMut(&P::State) -> P::State,
{
    for p in particles {
        let next = f(p.state());
        *p.state_mut() = next;
    }
}

/// Replace every weight with `f(&state)`.
pub fn reweight<P, F>(particles: &mut [P], mut f: F)
where
    P: ParticleMut,
    F: FnMut(&P::State) -> P::Weight,
{
    for p in particles {
        let weight = f(p.state());
        p.set_weight(weight);
    }
}

/// Sum of all weights, as `f64`.
pub fn total_weight<P: Particle>(particles: &[P]) -> f64 {
    particles.iter().map(|p| Into::<f64>::into(p.weight())).sum()
}

/// Draw `n` particles with replacement and collect them.
///
/// # Errors
/// Any [`InvalidWeights`] reported for the weights of `particles`.
pub fn resample<C, R>(particles: C, n: usize, rng: &mut R) -> Result<Vec<C::Item>, InvalidWeights>
where
    C: ParticleSet,
    C::Item: Clone,
    R: Rng + ?Sized,
{
    let mut view = ResamplingView::new(particles, rng)?;
    if n == 0 {
        return Ok(Vec::new());
    }
    Ok(view.iter().take(n).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn propagate_then_reweight() {
        let mut particles = vec![(1.0f64, 1.0f64), (2.0, 1.0), (3.0, 1.0)];
        propagate(&mut particles, |x| x * 10.0);
        reweight(&mut particles, |x| if *x > 15.0 { 1.0 } else { 0.0 });
        assert_eq!(particles, vec![(10.0, 0.0), (20.0, 1.0), (30.0, 1.0)]);
        assert_eq!(total_weight(&particles), 2.0);
    }

    #[test]
    fn resample_collects_exactly_n() {
        let mut rng = StdRng::seed_from_u64(21);
        let particles = vec![(1, 1.0), (2, 0.0), (3, 3.0)];
        for n in [0, 1, 50] {
            let out = resample(&particles, n, &mut rng).unwrap();
            assert_eq!(out.len(), n);
            assert!(out.iter().all(|p| p.0 != 2));
        }
    }

    #[test]
    fn resample_rejects_before_drawing() {
        let mut rng = rand::rng();
        let empty: Vec<(u8, f64)> = Vec::new();
        assert_eq!(resample(empty, 3, &mut rng).unwrap_err(), InvalidWeights::Empty);
    }
}
