use crate::error::SignalError;
use crate::signal::noise::NoiseSource;
use crate::signal::waveform::{
    WaveformParameters, WaveformSamples, sample_waveform,
};

/// Square greyscale image, row-major, where every column holds one value.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformImage {
    size: usize,
    pixels: Vec<u8>,
}

impl WaveformImage {
    /// Broadcasts each sample down its own column.
    pub fn from_samples(samples: &WaveformSamples) -> Self {
        let size = samples.len();
        let columns: Vec<u8> = samples
            .y
            .iter()
            .map(|&y| quantize(y))
            .collect();
        let mut pixels = Vec::with_capacity(size * size);
        for _ in 0..size {
            pixels.extend_from_slice(&columns);
        }
        Self { size, pixels }
    }

    pub fn width(&self) -> usize {
        self.size
    }

    pub fn height(&self) -> usize {
        self.size
    }

    pub fn pixel(&self, row: usize, col: usize) -> u8 {
        self.pixels[row * self.size + col]
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.pixels[row * self.size..(row + 1) * self.size]
    }

    /// Intensity of each column, read from the bottom row.
    pub fn columns(&self) -> &[u8] {
        if self.size == 0 {
            return &[];
        }
        self.row(0)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }
}

/// Clamp then truncate toward zero, like an 8-bit unsigned cast.
pub fn quantize(y: f64) -> u8 {
    y.clamp(0.0, 255.0) as u8
}

pub fn rasterize_waveform<N: NoiseSource + ?Sized>(
    params: &WaveformParameters,
    noise: &mut N,
) -> Result<WaveformImage, SignalError> {
    let samples = sample_waveform(params, noise)?;
    Ok(WaveformImage::from_samples(&samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::GaussianNoise;

    #[test]
    fn quantize_truncates() {
        assert_eq!(quantize(254.99), 254);
        assert_eq!(quantize(0.7), 0);
        assert_eq!(quantize(300.0), 255);
        assert_eq!(quantize(-4.0), 0);
    }

    #[test]
    fn image_is_square_and_column_uniform() {
        let params = WaveformParameters {
            sample_count: 40,
            noise_level: 20.0,
            ..WaveformParameters::default()
        };
        let image =
            rasterize_waveform(&params, &mut GaussianNoise::seeded(3)).unwrap();
        assert_eq!(image.width(), 40);
        assert_eq!(image.height(), 40);
        assert_eq!(image.as_raw().len(), 40 * 40);
        for row in 1..image.height() {
            assert_eq!(image.row(row), image.columns());
        }
    }
}
