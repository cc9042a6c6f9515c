//! Signal model: pure functions from parameters to samples.
//!
//! Nothing in here touches a terminal, a file or an audio device.

pub mod noise;
pub mod raster;
pub mod resample;
pub mod transform;
pub mod waveform;

pub use noise::{GaussianNoise, NoiseSource};
pub use raster::{WaveformImage, rasterize_waveform};
pub use resample::resample_fft;
pub use transform::{
    AudioBuffer, AudioTransformParameters, TransformedAudio, transform_audio,
};
pub use waveform::{WaveformParameters, WaveformSamples, sample_waveform};

/// `n` evenly spaced values over `[start, stop]`, both endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> =
                (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// Round to nearest and saturate into the 16-bit PCM range.
pub fn to_i16(value: f64) -> i16 {
    if value.is_nan() {
        return 0;
    }
    value
        .round()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_endpoints() {
        let x = linspace(0.0, 1000.0, 7);
        assert_eq!(x.len(), 7);
        assert_eq!(x[0], 0.0);
        assert_eq!(x[6], 1000.0);
        assert!((x[3] - 500.0).abs() < 1e-9);
    }

    #[test]
    fn linspace_degenerate_lengths() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 1.0, 1), vec![3.0]);
    }

    #[test]
    fn to_i16_saturates_instead_of_wrapping() {
        assert_eq!(to_i16(40000.0), i16::MAX);
        assert_eq!(to_i16(-40000.0), i16::MIN);
        assert_eq!(to_i16(12.6), 13);
        assert_eq!(to_i16(-12.4), -12);
        assert_eq!(to_i16(f64::NAN), 0);
    }
}
