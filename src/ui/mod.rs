pub mod audio_shell;
pub mod figure;
pub mod plot;
pub mod progress;
pub mod slider;
pub mod waveform_shell;

use dialoguer::{Input, Select};
use std::path::PathBuf;
use tracing::error;

use crate::error::AppError;
use slider::Slider;

pub use audio_shell::{AudioControl, AudioShell};
pub use plot::PlotSize;
pub use waveform_shell::{WaveformControl, WaveformShell, WaveformView};

pub fn print_banner() {
    println!("WaveLab-rs");
}

/// Menu prompt; `None` when the user backs out with Esc.
pub fn choose(prompt: &str, items: &[String]) -> Result<Option<usize>, AppError> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()?)
}

/// Asks for a new slider value, re-prompting until it is in bounds.
pub fn ask_value(slider: Slider, current: f64) -> Result<f64, AppError> {
    let value: f64 = Input::new()
        .with_prompt(slider.label())
        .with_initial_text(current.to_string())
        .validate_with(move |v: &f64| -> Result<(), String> {
            slider
                .accept(*v)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    slider.accept(value)
}

/// What a shell loop does after an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Leave,
}

/// Logs recoverable failures and keeps the loop going; Ctrl-C leaves it;
/// anything else is handed back to the caller.
pub fn settle(outcome: Result<(), AppError>) -> Result<Flow, AppError> {
    match outcome {
        Ok(()) => Ok(Flow::Continue),
        Err(e) if e.is_interrupt() => Ok(Flow::Leave),
        Err(e) if e.is_recoverable() => {
            error!("{}", e);
            Ok(Flow::Continue)
        }
        Err(e) => Err(e),
    }
}

/// File-open prompt for the audio source.
pub fn ask_path(prompt: &str) -> Result<PathBuf, AppError> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}
