use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::AppError;
use crate::signal::{TransformedAudio, WaveformImage, WaveformSamples};

/// What an export path asks for, decided by its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpFormat {
    Json,
    Svg,
}

impl DumpFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => DumpFormat::Svg,
            _ => DumpFormat::Json,
        }
    }
}

/// A rendered line chart, for plotting outside the terminal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlotData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// A rendered raster; rows are identical so only columns are kept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RasterData {
    pub size: usize,
    pub columns: Vec<u8>,
}

impl PlotData {
    pub fn from_waveform(samples: &WaveformSamples) -> Self {
        Self {
            title: "Sinusoidal wave".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            x: samples.x.clone(),
            y: samples.y.clone(),
        }
    }

    pub fn from_audio(samples: &[i16], time_axis: &[f64]) -> Self {
        Self {
            title: "Signal".to_string(),
            x_label: "Time".to_string(),
            y_label: "Amplitude".to_string(),
            x: time_axis.to_vec(),
            y: samples.iter().map(|&s| s as f64).collect(),
        }
    }

    pub fn from_transformed(audio: &TransformedAudio) -> Self {
        Self::from_audio(&audio.buffer.samples, &audio.time_axis)
    }
}

impl RasterData {
    pub fn from_image(image: &WaveformImage) -> Self {
        Self {
            size: image.width(),
            columns: image.columns().to_vec(),
        }
    }
}

/// Creates the directory `path` will be written into.
pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::output(path, e))?;
        }
    }
    Ok(())
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| AppError::output(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| AppError::output(path, e))?;
    info!("Plot data written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_plot_round_trips_through_json() {
        let data = PlotData::from_audio(&[1, -2, 3], &[0.0, 0.5, 1.0]);
        let text = serde_json::to_string(&data).unwrap();
        let back: PlotData = serde_json::from_str(&text).unwrap();
        assert_eq!(back, data);
        assert_eq!(back.y, vec![1.0, -2.0, 3.0]);
    }

    #[test]
    fn writes_file_to_nested_directory() {
        let dir = std::env::temp_dir().join(format!(
            "wavelab_dump_{}",
            std::process::id()
        ));
        let path = dir.join("nested").join("raster.json");
        let data = RasterData {
            size: 2,
            columns: vec![0, 255],
        };
        write_json(&data, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: RasterData = serde_json::from_str(&text).unwrap();
        assert_eq!(back, data);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn format_follows_extension() {
        let format = |p: &str| DumpFormat::from_path(Path::new(p));
        assert_eq!(format("a/plot.svg"), DumpFormat::Svg);
        assert_eq!(format("PLOT.SVG"), DumpFormat::Svg);
        assert_eq!(format("plot.json"), DumpFormat::Json);
        assert_eq!(format("plot"), DumpFormat::Json);
    }

    #[test]
    fn directory_as_target_is_an_output_error() {
        let data = RasterData {
            size: 0,
            columns: vec![],
        };
        let err = write_json(&data, &std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, AppError::OutputWrite { .. }), "{err:?}");
        assert!(err.is_recoverable());
    }
}
