use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

use crate::audio::{decode_to_mono, write_wav};
use crate::device::Playback;
use crate::error::AppError;
use crate::signal::{
    AudioBuffer, AudioTransformParameters, NoiseSource, TransformedAudio,
    linspace, transform_audio,
};
use crate::ui::figure;
use crate::ui::plot::{self, PlotSize, auto_range};
use crate::ui::progress::{templates, spinner, with_spinner};
use crate::ui::slider::Slider;
use crate::ui::{Flow, ask_path, ask_value, choose, settle};
use crate::utils::consts::audio_ranges;
use crate::utils::dump::{DumpFormat, PlotData, write_json};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioControl {
    SamplingFactor,
    Noise,
    Amplitude,
    Speed,
}

impl AudioControl {
    pub const ALL: [AudioControl; 4] = [
        AudioControl::SamplingFactor,
        AudioControl::Noise,
        AudioControl::Amplitude,
        AudioControl::Speed,
    ];

    pub fn slider(self) -> Slider {
        use audio_ranges as r;
        match self {
            AudioControl::SamplingFactor => {
                Slider::new("Sampling frequency", r::SAMPLING_FACTOR)
            }
            AudioControl::Noise => Slider::new("Noise level", r::NOISE),
            AudioControl::Amplitude => {
                Slider::new("Amplitude", r::AMPLITUDE_FACTOR)
            }
            AudioControl::Speed => Slider::new("Speed", r::SPEED_FACTOR),
        }
    }

    pub fn current(self, params: &AudioTransformParameters) -> f64 {
        match self {
            AudioControl::SamplingFactor => params.sampling_factor,
            AudioControl::Noise => params.noise_level,
            AudioControl::Amplitude => params.amplitude_factor,
            AudioControl::Speed => params.speed_factor,
        }
    }

    pub fn apply(
        self,
        params: AudioTransformParameters,
        value: f64,
    ) -> AudioTransformParameters {
        match self {
            AudioControl::SamplingFactor => AudioTransformParameters {
                sampling_factor: value,
                ..params
            },
            AudioControl::Noise => AudioTransformParameters {
                noise_level: value,
                ..params
            },
            AudioControl::Amplitude => AudioTransformParameters {
                amplitude_factor: value,
                ..params
            },
            AudioControl::Speed => AudioTransformParameters {
                speed_factor: value,
                ..params
            },
        }
    }
}

enum MenuAction {
    Adjust(AudioControl),
    Play,
    Stop,
    Open,
    Export,
    Quit,
}

/// Owns the loaded source, the transform parameters and the player.
pub struct AudioShell<N: NoiseSource> {
    source: Option<AudioBuffer>,
    params: AudioTransformParameters,
    noise: N,
    player: Box<dyn Playback>,
    output_path: PathBuf,
    plot_size: PlotSize,
    plotted: Option<PlotData>,
}

impl<N: NoiseSource> AudioShell<N> {
    pub fn new(
        player: Box<dyn Playback>,
        noise: N,
        output_path: PathBuf,
        plot_size: PlotSize,
    ) -> Self {
        Self {
            source: None,
            params: AudioTransformParameters::default(),
            noise,
            player,
            output_path,
            plot_size,
            plotted: None,
        }
    }

    pub fn params(&self) -> &AudioTransformParameters {
        &self.params
    }

    pub fn source(&self) -> Option<&AudioBuffer> {
        self.source.as_ref()
    }

    pub fn plotted(&self) -> Option<&PlotData> {
        self.plotted.as_ref()
    }

    /// Decodes `path` and makes it the source. The current source is kept
    /// if decoding fails.
    pub fn load(&mut self, path: &Path) -> Result<(), AppError> {
        let buffer = with_spinner("Decoding", || decode_to_mono(path))?;
        self.set_source(buffer);
        Ok(())
    }

    /// Installs an already decoded source and plots it on a unit time axis.
    pub fn set_source(&mut self, buffer: AudioBuffer) {
        let t = linspace(0.0, 1.0, buffer.len());
        self.plotted = Some(PlotData::from_audio(&buffer.samples, &t));
        self.source = Some(buffer);
    }

    pub fn set(&mut self, control: AudioControl, raw: f64) -> Result<(), AppError> {
        let value = control.slider().accept(raw)?;
        self.params = control.apply(self.params, value);
        debug!("Audio parameters: {:?}", self.params);
        Ok(())
    }

    /// Transform, write the transient WAV, start playback, update the
    /// plot. Does nothing when no source is loaded.
    pub fn play(&mut self) -> Result<Option<TransformedAudio>, AppError> {
        let Some(source) = self.source.as_ref() else {
            debug!("Play requested without a source, ignoring");
            return Ok(None);
        };

        let params = self.params;
        let noise = &mut self.noise;
        let transformed = with_spinner("Transforming", || {
            transform_audio(source, &params, noise)
        })?;
        info!(
            "Transformed {} -> {} samples, output rate {} Hz ({:.2} s)",
            source.len(),
            transformed.buffer.len(),
            transformed.buffer.sample_rate,
            transformed.buffer.duration_secs()
        );

        let pb = spinner(templates::WRITE, "Writing");
        let written = write_wav(&transformed.buffer, &self.output_path);
        pb.finish_and_clear();
        written?;

        match self.player.play(&self.output_path) {
            Ok(()) => {}
            Err(AppError::PlaybackUnavailable(reason)) => {
                warn!("Skipping playback: {}", reason);
            }
            Err(e) => return Err(e),
        }

        self.plotted = Some(PlotData::from_transformed(&transformed));
        Ok(Some(transformed))
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// Stops playback and releases the device.
    pub fn quit(&mut self) {
        self.player.quit();
    }

    pub fn render(&self) -> String {
        match &self.plotted {
            None => String::from("(no audio loaded)\n"),
            Some(data) => {
                let (x_range, y_range) = ranges(data);
                plot::line_chart(
                    &data.title,
                    &data.x,
                    &data.y,
                    x_range,
                    y_range,
                    self.plot_size,
                )
            }
        }
    }

    /// Writes the plotted signal as JSON, or as an SVG figure when `path`
    /// ends in `.svg`.
    pub fn export(&self, path: &Path) -> Result<(), AppError> {
        let Some(data) = &self.plotted else {
            return Ok(());
        };
        match DumpFormat::from_path(path) {
            DumpFormat::Json => write_json(data, path),
            DumpFormat::Svg => {
                let (x_range, y_range) = ranges(data);
                figure::line_svg(data, x_range, y_range, path)
            }
        }
    }

    fn menu(&self, export: bool) -> Vec<(String, MenuAction)> {
        let mut items: Vec<(String, MenuAction)> = AudioControl::ALL
            .iter()
            .map(|&c| {
                let text = c.slider().describe(c.current(&self.params));
                (text, MenuAction::Adjust(c))
            })
            .collect();
        items.push(("Play sound".to_string(), MenuAction::Play));
        items.push(("Stop sound".to_string(), MenuAction::Stop));
        items.push(("Open audio file".to_string(), MenuAction::Open));
        if export {
            items.push(("Export plot data".to_string(), MenuAction::Export));
        }
        items.push(("Quit".to_string(), MenuAction::Quit));
        items
    }

    pub fn run(
        &mut self,
        running: &AtomicBool,
        dump: Option<&Path>,
    ) -> Result<(), AppError> {
        println!("{}", self.render());
        let result = self.event_loop(running, dump);
        self.quit();
        info!("Leaving audio shell");
        result
    }

    fn event_loop(
        &mut self,
        running: &AtomicBool,
        dump: Option<&Path>,
    ) -> Result<(), AppError> {
        while running.load(Ordering::SeqCst) {
            let mut menu = self.menu(dump.is_some());
            let labels: Vec<String> = menu
                .iter()
                .map(|(label, _)| label.clone())
                .collect();
            let index = match choose("Audio", &labels) {
                Ok(Some(index)) => index,
                Ok(None) => break,
                Err(e) if e.is_interrupt() => break,
                Err(e) => return Err(e),
            };

            let outcome = match menu.swap_remove(index).1 {
                MenuAction::Adjust(control) => {
                    ask_value(control.slider(), control.current(&self.params))
                        .and_then(|value| self.set(control, value))
                }
                MenuAction::Play => self.play().map(|played| {
                    if played.is_some() {
                        println!("{}", self.render());
                    }
                }),
                MenuAction::Stop => {
                    self.stop();
                    Ok(())
                }
                MenuAction::Open => match ask_path("Audio file")
                    .and_then(|path| self.load(&path))
                {
                    Ok(()) => {
                        println!("{}", self.render());
                        Ok(())
                    }
                    // a failed open keeps the current source
                    Err(e @ AppError::SourceLoadFailure { .. }) => {
                        error!("{}", e);
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
                MenuAction::Export => match dump {
                    Some(path) => self.export(path),
                    None => Ok(()),
                },
                MenuAction::Quit => break,
            };

            if settle(outcome)? == Flow::Leave {
                break;
            }
        }
        Ok(())
    }
}

fn ranges(data: &PlotData) -> ((f64, f64), (f64, f64)) {
    (
        auto_range(data.x.iter().copied()),
        auto_range(data.y.iter().copied()),
    )
}
