use std::path::Path;
use tracing::info;

use crate::audio::codec::downmix_into;
use crate::error::AppError;
use crate::signal::AudioBuffer;
use crate::utils::dump::ensure_parent_dir;

/// Writes a single-channel 16-bit PCM WAV, replacing any existing file.
pub fn write_wav(buffer: &AudioBuffer, filename: &Path) -> Result<(), AppError> {
    ensure_parent_dir(filename)?;
    let to_output = |e: hound::Error| match e {
        hound::Error::IoError(io) => AppError::output(filename, io),
        other => AppError::Wav(other),
    };

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::create(filename, spec).map_err(to_output)?;
    for &sample in &buffer.samples {
        writer.write_sample(sample).map_err(to_output)?;
    }
    writer.finalize().map_err(to_output)?;
    info!(
        "Wrote {} ({} samples at {} Hz)",
        filename.display(),
        buffer.len(),
        buffer.sample_rate
    );
    Ok(())
}

/// Reads any integer or float WAV back as mono 16-bit PCM.
pub fn read_wav(filename: &Path) -> Result<AudioBuffer, AppError> {
    let reader = hound::WavReader::open(filename)?;
    let spec = reader.spec();

    let interleaved: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|sample| {
                sample.map(|value| {
                    (value * 32768.0)
                        .round()
                        .clamp(i16::MIN as f32, i16::MAX as f32)
                        as i16
                })
            })
            .collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let shift = spec.bits_per_sample as i32 - 16;
            reader
                .into_samples::<i32>()
                .map(|sample| {
                    sample.map(|value| {
                        if shift >= 0 {
                            (value >> shift) as i16
                        } else {
                            (value << -shift) as i16
                        }
                    })
                })
                .collect::<Result<_, _>>()?
        }
    };

    let mut samples = Vec::with_capacity(interleaved.len());
    downmix_into(&interleaved, spec.channels as usize, &mut samples);
    Ok(AudioBuffer::new(samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_only_latest_buffer() {
        let path = std::env::temp_dir().join(format!(
            "wavelab_wav_{}.wav",
            std::process::id()
        ));
        let first = AudioBuffer::new(vec![1; 500], 8000);
        let second = AudioBuffer::new(vec![-5, 5, i16::MAX, i16::MIN], 16000);
        write_wav(&first, &path).unwrap();
        write_wav(&second, &path).unwrap();
        let back = read_wav(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, second);
    }

    #[test]
    fn unwritable_destination_is_an_output_error() {
        let blocker = std::env::temp_dir().join(format!(
            "wavelab_wav_blocker_{}",
            std::process::id()
        ));
        std::fs::write(&blocker, b"plain file").unwrap();
        let err = write_wav(
            &AudioBuffer::new(vec![0; 8], 8000),
            &blocker.join("output.wav"),
        )
        .unwrap_err();
        std::fs::remove_file(&blocker).ok();
        assert!(matches!(err, AppError::OutputWrite { .. }), "{err:?}");
        assert!(err.is_recoverable());
    }
}
