use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::error::AppError;
use crate::signal::{
    NoiseSource, WaveformImage, WaveformParameters, WaveformSamples,
    sample_waveform,
};
use crate::ui::figure;
use crate::ui::plot::{self, PlotSize};
use crate::ui::slider::Slider;
use crate::ui::{Flow, ask_value, choose, settle};
use crate::utils::consts::{LUMA_MAX, LUMA_MIN, X_DOMAIN_MAX, waveform_ranges};
use crate::utils::dump::{DumpFormat, PlotData, RasterData, write_json};

/// Line plot or column raster of the same waveform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveformView {
    Line,
    Raster,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveformControl {
    Cycle,
    Amplitude,
    Sampling,
    Noise,
    Phase,
    VerticalShift,
}

impl WaveformControl {
    pub const ALL: [WaveformControl; 6] = [
        WaveformControl::Cycle,
        WaveformControl::Amplitude,
        WaveformControl::Sampling,
        WaveformControl::Noise,
        WaveformControl::Phase,
        WaveformControl::VerticalShift,
    ];

    pub fn slider(self, view: WaveformView) -> Slider {
        use waveform_ranges as r;
        match self {
            WaveformControl::Cycle => Slider::new("Cycle", r::CYCLE),
            WaveformControl::Amplitude => Slider::new("Amplitude", r::AMPLITUDE),
            WaveformControl::Sampling => match view {
                WaveformView::Line => Slider::new("Sampling", r::SAMPLING_LINE),
                WaveformView::Raster => {
                    Slider::new("Sampling", r::SAMPLING_RASTER)
                }
            },
            WaveformControl::Noise => Slider::new("Noise Level", r::NOISE),
            WaveformControl::Phase => {
                Slider::new("Phase Shift (degrees)", r::PHASE_DEGREES)
            }
            WaveformControl::VerticalShift => {
                Slider::new("Vertical Shift", r::VERTICAL_SHIFT)
            }
        }
    }

    /// Current value in slider units (phase in degrees).
    pub fn current(self, params: &WaveformParameters) -> f64 {
        match self {
            WaveformControl::Cycle => params.cycle_count,
            WaveformControl::Amplitude => params.amplitude,
            WaveformControl::Sampling => params.sample_count as f64,
            WaveformControl::Noise => params.noise_level,
            WaveformControl::Phase => {
                (params.phase_radians.to_degrees() * 1e6).round() / 1e6
            }
            WaveformControl::VerticalShift => params.vertical_shift,
        }
    }

    /// New parameter set with one field replaced.
    pub fn apply(
        self,
        params: WaveformParameters,
        value: f64,
    ) -> WaveformParameters {
        match self {
            WaveformControl::Cycle => WaveformParameters {
                cycle_count: value,
                ..params
            },
            WaveformControl::Amplitude => WaveformParameters {
                amplitude: value,
                ..params
            },
            WaveformControl::Sampling => WaveformParameters {
                sample_count: value.round() as usize,
                ..params
            },
            WaveformControl::Noise => WaveformParameters {
                noise_level: value,
                ..params
            },
            WaveformControl::Phase => WaveformParameters {
                phase_radians: value.to_radians(),
                ..params
            },
            WaveformControl::VerticalShift => WaveformParameters {
                vertical_shift: value,
                ..params
            },
        }
    }
}

/// What is currently on screen.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Line(WaveformSamples),
    Raster(WaveformImage),
}

/// Owns the waveform parameters and the last rendered frame.
pub struct WaveformShell<N: NoiseSource> {
    view: WaveformView,
    params: WaveformParameters,
    noise: N,
    plot_size: PlotSize,
    frame: Option<Frame>,
}

enum MenuAction {
    Adjust(WaveformControl),
    Redraw,
    Export,
    Quit,
}

impl<N: NoiseSource> WaveformShell<N> {
    pub fn new(view: WaveformView, noise: N, plot_size: PlotSize) -> Self {
        Self {
            view,
            params: WaveformParameters::default(),
            noise,
            plot_size,
            frame: None,
        }
    }

    pub fn params(&self) -> &WaveformParameters {
        &self.params
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Validates and stores a value without recomputing.
    pub fn apply(
        &mut self,
        control: WaveformControl,
        raw: f64,
    ) -> Result<(), AppError> {
        let value = control.slider(self.view).accept(raw)?;
        self.params = control.apply(self.params, value);
        Ok(())
    }

    /// Slider change: store, then recompute and redraw. On failure the
    /// previous parameters and frame are kept.
    pub fn set(
        &mut self,
        control: WaveformControl,
        raw: f64,
    ) -> Result<(), AppError> {
        let previous = self.params;
        self.apply(control, raw)?;
        if let Err(e) = self.redraw() {
            self.params = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Recomputes the frame from the current parameters with fresh noise.
    pub fn redraw(&mut self) -> Result<(), AppError> {
        debug!("Recomputing waveform: {:?}", self.params);
        let samples = sample_waveform(&self.params, &mut self.noise)?;
        self.frame = Some(match self.view {
            WaveformView::Line => Frame::Line(samples),
            WaveformView::Raster => {
                Frame::Raster(WaveformImage::from_samples(&samples))
            }
        });
        Ok(())
    }

    pub fn render(&self) -> String {
        match &self.frame {
            None => String::from("(nothing rendered yet)\n"),
            Some(Frame::Line(samples)) => plot::line_chart(
                "Sinusoidal wave",
                &samples.x,
                &samples.y,
                (0.0, X_DOMAIN_MAX),
                (LUMA_MIN, LUMA_MAX),
                self.plot_size,
            ),
            Some(Frame::Raster(image)) => plot::raster(
                &format!("Sinusoidal image {0}x{0}", image.width()),
                image,
                self.plot_size,
            ),
        }
    }

    /// Writes the current frame as JSON, or as an SVG figure when `path`
    /// ends in `.svg`.
    pub fn export(&self, path: &Path) -> Result<(), AppError> {
        let format = DumpFormat::from_path(path);
        match &self.frame {
            None => Ok(()),
            Some(Frame::Line(samples)) => {
                let data = PlotData::from_waveform(samples);
                match format {
                    DumpFormat::Json => write_json(&data, path),
                    DumpFormat::Svg => figure::line_svg(
                        &data,
                        (0.0, X_DOMAIN_MAX),
                        (LUMA_MIN, LUMA_MAX),
                        path,
                    ),
                }
            }
            Some(Frame::Raster(image)) => {
                let data = RasterData::from_image(image);
                match format {
                    DumpFormat::Json => write_json(&data, path),
                    DumpFormat::Svg => figure::raster_svg(
                        &format!("Sinusoidal image {0}x{0}", data.size),
                        &data,
                        path,
                    ),
                }
            }
        }
    }

    fn menu(&self, export: bool) -> Vec<(String, MenuAction)> {
        let mut items: Vec<(String, MenuAction)> = WaveformControl::ALL
            .iter()
            .map(|&c| {
                let text = c
                    .slider(self.view)
                    .describe(c.current(&self.params));
                (text, MenuAction::Adjust(c))
            })
            .collect();
        items.push(("Redraw".to_string(), MenuAction::Redraw));
        if export {
            items.push(("Export plot data".to_string(), MenuAction::Export));
        }
        items.push(("Quit".to_string(), MenuAction::Quit));
        items
    }

    /// Event loop: one prompt, one full recompute-and-redraw, repeat.
    pub fn run(
        &mut self,
        running: &AtomicBool,
        dump: Option<&Path>,
    ) -> Result<(), AppError> {
        println!("{}", self.render());
        while running.load(Ordering::SeqCst) {
            let mut menu = self.menu(dump.is_some());
            let labels: Vec<String> = menu
                .iter()
                .map(|(label, _)| label.clone())
                .collect();
            let index = match choose("Adjust", &labels) {
                Ok(Some(index)) => index,
                Ok(None) => break,
                Err(e) if e.is_interrupt() => break,
                Err(e) => return Err(e),
            };

            let outcome = match menu.swap_remove(index).1 {
                MenuAction::Adjust(control) => {
                    let slider = control.slider(self.view);
                    ask_value(slider, control.current(&self.params))
                        .and_then(|value| self.set(control, value))
                }
                MenuAction::Redraw => self.redraw(),
                MenuAction::Export => match dump {
                    Some(path) => self.export(path),
                    None => Ok(()),
                },
                MenuAction::Quit => break,
            };

            match settle(outcome)? {
                Flow::Continue => println!("{}", self.render()),
                Flow::Leave => break,
            }
        }
        info!("Leaving waveform shell");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::GaussianNoise;

    fn shell(view: WaveformView) -> WaveformShell<GaussianNoise<rand::rngs::StdRng>> {
        WaveformShell::new(view, GaussianNoise::seeded(1), PlotSize::new(40, 10))
    }

    #[test]
    fn phase_is_entered_in_degrees() {
        let mut shell = shell(WaveformView::Line);
        shell.set(WaveformControl::Phase, 90.0).unwrap();
        assert!((shell.params().phase_radians - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(WaveformControl::Phase.current(shell.params()), 90.0);
    }

    #[test]
    fn rejected_value_leaves_state_untouched() {
        let mut shell = shell(WaveformView::Line);
        shell.redraw().unwrap();
        let before = shell.frame().cloned();
        let params = *shell.params();

        let err = shell.set(WaveformControl::Amplitude, 500.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidParameterRange { .. }));
        assert_eq!(*shell.params(), params);
        assert_eq!(shell.frame().cloned(), before);
    }

    #[test]
    fn sampling_ranges_differ_per_view() {
        let mut line = shell(WaveformView::Line);
        let mut raster = shell(WaveformView::Raster);
        assert!(line.set(WaveformControl::Sampling, 5.0).is_ok());
        assert!(raster.set(WaveformControl::Sampling, 5.0).is_err());
        raster.set(WaveformControl::Sampling, 20.0).unwrap();
        match raster.frame() {
            Some(Frame::Raster(image)) => assert_eq!(image.width(), 20),
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[test]
    fn render_before_and_after_redraw() {
        let mut shell = shell(WaveformView::Raster);
        assert!(shell.render().contains("nothing rendered"));
        shell.redraw().unwrap();
        assert!(shell.render().contains("1000x1000"));
    }

    #[test]
    fn failed_export_keeps_frame_and_shell_usable() {
        let mut shell = shell(WaveformView::Line);
        shell.redraw().unwrap();
        let before = shell.frame().cloned();

        let err = shell.export(&std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, AppError::OutputWrite { .. }), "{err:?}");
        assert_eq!(settle(Err(err)).unwrap(), Flow::Continue);
        assert_eq!(shell.frame().cloned(), before);

        shell.set(WaveformControl::Cycle, 3.0).unwrap();
        assert_eq!(shell.params().cycle_count, 3.0);
        assert_ne!(shell.frame().cloned(), before);
    }

    #[test]
    fn svg_export_of_raster() {
        let mut shell = shell(WaveformView::Raster);
        shell.set(WaveformControl::Sampling, 10.0).unwrap();
        let path = std::env::temp_dir().join(format!(
            "wavelab_shell_raster_{}.svg",
            std::process::id()
        ));
        shell.export(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.contains("<svg"));
    }
}
