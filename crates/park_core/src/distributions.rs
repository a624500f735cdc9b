//! Seeded sampling primitives shared across the simulation.
//!
//! Every draw goes through a caller-supplied [`rand::Rng`], so determinism
//! is decided entirely by how the caller seeds its stream.

use rand::Rng;

/// Above this rate the Poisson product loop is replaced by a normal
/// approximation: `e^-lambda` underflows long before `f64` gives out and
/// the loop would never terminate.
const POISSON_NORMAL_APPROX_RATE: f64 = 60.0;

/// Sample a Poisson-distributed count with the given rate.
pub fn sample_poisson<R: Rng>(rng: &mut R, lambda: f64) -> u32 {
    if lambda <= 0.0 {
        return 0;
    }
    if lambda > POISSON_NORMAL_APPROX_RATE {
        let draw = sample_normal(rng, lambda, lambda.sqrt());
        return draw.round().max(0.0) as u32;
    }
    let limit = (-lambda).exp();
    let mut count = 0u32;
    let mut product = 1.0f64;
    loop {
        product *= rng.gen::<f64>();
        if product <= limit {
            return count;
        }
        count += 1;
    }
}

/// Sample from N(mean, std_dev) via the Box-Muller transform.
pub fn sample_normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-12);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + std_dev * z
}

/// Pick an index with probability proportional to its weight.
///
/// Scans the cumulative weights against a single uniform draw; the final
/// index absorbs any floating-point remainder so a choice is always made.
pub fn weighted_choice<R: Rng>(rng: &mut R, weights: &[f64]) -> usize {
    debug_assert!(!weights.is_empty(), "weighted_choice over no weights");
    let total: f64 = weights.iter().sum();
    let draw = rng.gen::<f64>() * total;
    let mut floor = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        floor += weight;
        if draw < floor {
            return index;
        }
    }
    weights.len() - 1
}
