//! Gaussian noise used by every signal variant.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Source of zero-mean Gaussian noise.
pub trait NoiseSource {
    /// Draws one value with the given standard deviation.
    ///
    /// Must return exactly `0.0` when `std_dev` is zero so noise-free
    /// output is reproducible bit for bit.
    fn gaussian(&mut self, std_dev: f64) -> f64;

    /// Fills a fresh vector of `len` independent draws.
    fn gaussian_vec(&mut self, std_dev: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|_| self.gaussian(std_dev))
            .collect()
    }
}

/// Box-Muller Gaussian generator over any `rand` RNG.
pub struct GaussianNoise<R: Rng = ThreadRng> {
    rng: R,
    spare: Option<f64>,
}

impl GaussianNoise<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl Default for GaussianNoise<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianNoise<StdRng> {
    /// Reproducible noise for tests and `--seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GaussianNoise<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, spare: None }
    }

    fn standard_normal(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        // u1 in (0, 1] keeps ln() finite
        let u1 = 1.0 - self.rng.random::<f64>();
        let u2 = self.rng.random::<f64>();
        let radius = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;
        self.spare = Some(radius * theta.sin());
        radius * theta.cos()
    }
}

impl<R: Rng> NoiseSource for GaussianNoise<R> {
    fn gaussian(&mut self, std_dev: f64) -> f64 {
        if std_dev == 0.0 {
            return 0.0;
        }
        self.standard_normal() * std_dev
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn gaussian(&mut self, std_dev: f64) -> f64 {
        (**self).gaussian(std_dev)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn gaussian(&mut self, std_dev: f64) -> f64 {
        (**self).gaussian(std_dev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_std_dev_is_exactly_silent() {
        let mut noise = GaussianNoise::seeded(1);
        assert!(
            noise
                .gaussian_vec(0.0, 64)
                .iter()
                .all(|&v| v == 0.0)
        );
    }

    #[test]
    fn same_seed_same_draws() {
        let a = GaussianNoise::seeded(7).gaussian_vec(3.0, 32);
        let b = GaussianNoise::seeded(7).gaussian_vec(3.0, 32);
        assert_eq!(a, b);
    }

    #[test]
    fn moments_match_requested_distribution() {
        let mut noise = GaussianNoise::seeded(42);
        let draws = noise.gaussian_vec(10.0, 20_000);
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let var = draws
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;
        println!("mean {mean:.3}, std {:.3}", var.sqrt());
        assert!(mean.abs() < 0.5);
        assert!((var.sqrt() - 10.0).abs() < 0.5);
    }
}
