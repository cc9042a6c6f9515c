use serde::Serialize;
use std::f64::consts::PI;

use crate::error::SignalError;
use crate::signal::linspace;
use crate::signal::noise::NoiseSource;
use crate::utils::consts::{LUMA_MAX, LUMA_MIN, X_DOMAIN_MAX};

/// Everything the sampler and rasterizer need to draw one sinusoid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaveformParameters {
    /// Full periods across the x domain.
    pub cycle_count: f64,
    pub amplitude: f64,
    pub sample_count: usize,
    /// Standard deviation of the additive Gaussian noise.
    pub noise_level: f64,
    pub phase_radians: f64,
    pub vertical_shift: f64,
}

impl Default for WaveformParameters {
    fn default() -> Self {
        use crate::utils::consts::waveform_defaults as d;
        Self {
            cycle_count: d::CYCLE,
            amplitude: d::AMPLITUDE,
            sample_count: d::SAMPLING,
            noise_level: d::NOISE,
            phase_radians: d::PHASE_DEGREES.to_radians(),
            vertical_shift: d::VERTICAL_SHIFT,
        }
    }
}

/// Ordered `(x, y)` pairs, `y` already clamped to the luma range.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformSamples {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl WaveformSamples {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .copied()
            .zip(self.y.iter().copied())
    }
}

/// `amplitude * sin(2π * cycle * x / max(x) + phase) + noise + shift`,
/// clamped to `[0, 255]`, over `sample_count` points of `[0, 1000]`.
///
/// A fresh noise vector is drawn on every call.
pub fn sample_waveform<N: NoiseSource + ?Sized>(
    params: &WaveformParameters,
    noise: &mut N,
) -> Result<WaveformSamples, SignalError> {
    if params.sample_count == 0 {
        return Err(SignalError::EmptySampleAxis);
    }

    let x = linspace(0.0, X_DOMAIN_MAX, params.sample_count);
    let noise = noise.gaussian_vec(params.noise_level, params.sample_count);
    let x_max = x
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let y = x
        .iter()
        .zip(noise.iter())
        .map(|(&x, &n)| {
            // a single sample sits at x = 0 = max(x)
            let position = if x_max > 0.0 { x / x_max } else { 0.0 };
            let y = params.amplitude
                * (2.0 * PI * params.cycle_count * position
                    + params.phase_radians)
                    .sin()
                + n
                + params.vertical_shift;
            y.clamp(LUMA_MIN, LUMA_MAX)
        })
        .collect();

    Ok(WaveformSamples { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::GaussianNoise;

    fn quiet(sample_count: usize) -> WaveformParameters {
        WaveformParameters {
            sample_count,
            ..WaveformParameters::default()
        }
    }

    #[test]
    fn starts_at_vertical_shift_without_phase() {
        let mut noise = GaussianNoise::seeded(0);
        let samples = sample_waveform(&quiet(1000), &mut noise).unwrap();
        assert_eq!(samples.len(), 1000);
        assert!((samples.y[0] - 127.0).abs() < 1e-9);
    }

    #[test]
    fn single_sample_does_not_produce_nan() {
        let mut noise = GaussianNoise::seeded(0);
        let params = WaveformParameters {
            phase_radians: PI / 2.0,
            ..quiet(1)
        };
        let samples = sample_waveform(&params, &mut noise).unwrap();
        assert_eq!(samples.x, vec![0.0]);
        assert_eq!(samples.y, vec![254.0]);
    }

    #[test]
    fn zero_samples_is_an_error() {
        let mut noise = GaussianNoise::seeded(0);
        assert_eq!(
            sample_waveform(&quiet(0), &mut noise),
            Err(SignalError::EmptySampleAxis)
        );
    }

    #[test]
    fn heavy_noise_still_clamped() {
        let mut noise = GaussianNoise::seeded(9);
        let params = WaveformParameters {
            noise_level: 500.0,
            ..quiet(500)
        };
        let samples = sample_waveform(&params, &mut noise).unwrap();
        assert!(
            samples
                .y
                .iter()
                .all(|&y| (0.0..=255.0).contains(&y))
        );
        assert!(samples.y.iter().any(|&y| y == 0.0));
        assert!(samples.y.iter().any(|&y| y == 255.0));
    }
}
