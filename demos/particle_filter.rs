//! A 1-D bootstrap particle filter tracking a noisy random walk.

use rand::Rng;
use resampling::{Particle, propagate, resample, reweight, total_weight};

#[derive(Copy, Clone, Debug, Particle)]
struct Hypothesis {
    state: f64,
    weight: f64,
}

const PARTICLES: usize = 2_000;
const STEPS: usize = 25;
const PROCESS_NOISE: f64 = 0.5;
const SENSOR_NOISE: f64 = 1.0;

fn likelihood(predicted: f64, observed: f64) -> f64 {
    let z = (predicted - observed) / SENSOR_NOISE;
    (-0.5 * z * z).exp()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();

    let mut truth = 0.0f64;
    let mut particles: Vec<Hypothesis> = (0..PARTICLES)
        .map(|_| Hypothesis {
            state: rng.random_range(-5.0..5.0),
            weight: 1.0,
        })
        .collect();

    for step in 0..STEPS {
        truth += rng.random_range(-PROCESS_NOISE..PROCESS_NOISE);
        let observed = truth + rng.random_range(-SENSOR_NOISE..SENSOR_NOISE);

        propagate(&mut particles, |x| {
            x + rng.random_range(-PROCESS_NOISE..PROCESS_NOISE)
        });
        reweight(&mut particles, |x| likelihood(*x, observed));

        let total = total_weight(&particles);
        let estimate = particles.iter().map(|p| p.state * p.weight).sum::<f64>() / total;
        println!("{step:>3} truth={truth:>7.3} observed={observed:>7.3} estimate={estimate:>7.3}");

        particles = resample(&particles, PARTICLES, &mut rng)?;
    }

    Ok(())
}
