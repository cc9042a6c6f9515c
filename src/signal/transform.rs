use crate::error::SignalError;
use crate::signal::noise::NoiseSource;
use crate::signal::resample::resample_fft;
use crate::signal::{linspace, to_i16};

/// Mono 16-bit PCM with its sample rate.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Samples scaled to `[-1.0, 1.0)`.
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples
            .iter()
            .map(|&s| s as f32 / 32768.0)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioTransformParameters {
    pub sampling_factor: f64,
    /// Standard deviation of the noise, in PCM units.
    pub noise_level: f64,
    pub amplitude_factor: f64,
    pub speed_factor: f64,
}

impl Default for AudioTransformParameters {
    fn default() -> Self {
        use crate::utils::consts::audio_defaults as d;
        Self {
            sampling_factor: d::SAMPLING_FACTOR,
            noise_level: d::NOISE,
            amplitude_factor: d::AMPLITUDE_FACTOR,
            speed_factor: d::SPEED_FACTOR,
        }
    }
}

impl AudioTransformParameters {
    pub fn target_len(&self, source_len: usize) -> usize {
        (source_len as f64 * self.sampling_factor / self.speed_factor).round()
            as usize
    }

    /// Rate that keeps the output at `1 / speed_factor` of the source
    /// duration.
    pub fn output_rate(&self, source_rate: u32) -> u32 {
        (self.sampling_factor * source_rate as f64).round() as u32
    }

    fn check(&self) -> Result<(), SignalError> {
        let factors = [
            ("sampling factor", self.sampling_factor),
            ("amplitude factor", self.amplitude_factor),
            ("speed factor", self.speed_factor),
        ];
        for (name, value) in factors {
            if !(value.is_finite() && value > 0.0) {
                return Err(SignalError::NonPositiveFactor { name, value });
            }
        }
        if !(self.noise_level.is_finite() && self.noise_level >= 0.0) {
            return Err(SignalError::NonPositiveFactor {
                name: "noise level",
                value: self.noise_level,
            });
        }
        Ok(())
    }
}

/// Resampled buffer plus the time axis it is plotted against.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformedAudio {
    pub buffer: AudioBuffer,
    pub time_axis: Vec<f64>,
}

/// Noise, then amplitude scaling, then band-limited resampling.
///
/// The source is never modified; a new buffer is returned.
pub fn transform_audio<N: NoiseSource + ?Sized>(
    source: &AudioBuffer,
    params: &AudioTransformParameters,
    noise: &mut N,
) -> Result<TransformedAudio, SignalError> {
    params.check()?;
    if source.is_empty() {
        return Err(SignalError::EmptySampleAxis);
    }

    let noise = noise.gaussian_vec(params.noise_level, source.len());
    let scaled: Vec<f64> = source
        .samples
        .iter()
        .zip(noise.iter())
        .map(|(&s, &n)| to_i16(params.amplitude_factor * (s as f64 + n)) as f64)
        .collect();

    let target_len = params.target_len(source.len());
    if target_len == 0 {
        return Err(SignalError::EmptySampleAxis);
    }

    let samples = resample_fft(&scaled, target_len)
        .into_iter()
        .map(to_i16)
        .collect();
    let time_axis = linspace(0.0, 1.0 / params.speed_factor, target_len);

    Ok(TransformedAudio {
        buffer: AudioBuffer::new(samples, params.output_rate(source.sample_rate)),
        time_axis,
    })
}
