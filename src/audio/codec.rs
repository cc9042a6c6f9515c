use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info};

use crate::error::AppError;
use crate::signal::AudioBuffer;

/// Decodes the first audio track of any supported container into mono
/// 16-bit PCM. Channels are averaged.
pub fn decode_to_mono(path: &Path) -> Result<AudioBuffer, AppError> {
    let fail = |reason: String| AppError::SourceLoadFailure {
        path: path.to_path_buf(),
        reason,
    };

    // 打开媒体文件
    let file = File::open(path).map_err(|e| fail(e.to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path
        .extension()
        .and_then(|e| e.to_str())
    {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| fail(e.to_string()))?;
    let mut format = probed.format;

    // 查找第一个音频轨道
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| fail("no audio track found".to_string()))?;

    let dec_opts: DecoderOptions = Default::default();
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .map_err(|e| fail(e.to_string()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => continue,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(fail(err.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate.get_or_insert(spec.rate);
                let mut buf = SampleBuffer::<i16>::new(
                    decoded.capacity() as u64,
                    spec,
                );
                buf.copy_interleaved_ref(decoded);
                downmix_into(buf.samples(), spec.channels.count(), &mut samples);
            }
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // 解码错误，跳过这个包
                debug!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(err) => return Err(fail(err.to_string())),
        }
    }

    let sample_rate =
        sample_rate.ok_or_else(|| fail("unknown sample rate".to_string()))?;
    info!(
        "Loaded {}: {} samples at {} Hz",
        path.display(),
        samples.len(),
        sample_rate
    );
    Ok(AudioBuffer::new(samples, sample_rate))
}

/// Averages interleaved frames down to one channel.
pub fn downmix_into(interleaved: &[i16], channels: usize, out: &mut Vec<i16>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    out.extend(
        interleaved
            .chunks(channels)
            .map(|frame| {
                let sum: i32 = frame
                    .iter()
                    .map(|&s| s as i32)
                    .sum();
                (sum / frame.len() as i32) as i16
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav::write_wav;

    #[test]
    fn downmix_averages_frames() {
        let mut out = Vec::new();
        downmix_into(&[100, 300, -10, 10, 7], 2, &mut out);
        assert_eq!(out, vec![200, 0, 7]);
    }

    #[test]
    fn decodes_a_wav_written_by_hound() {
        let path = std::env::temp_dir().join(format!(
            "wavelab_codec_{}.wav",
            std::process::id()
        ));
        let source = AudioBuffer::new(
            (0..2000)
                .map(|i| ((i % 100) * 300 - 15000) as i16)
                .collect(),
            22050,
        );
        write_wav(&source, &path).unwrap();
        let decoded = decode_to_mono(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(decoded, source);
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let err = decode_to_mono(Path::new("does/not/exist.mp3")).unwrap_err();
        assert!(matches!(err, AppError::SourceLoadFailure { .. }));
    }
}
