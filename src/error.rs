use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Failures of the pure signal functions.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalError {
    EmptySampleAxis,
    NonPositiveFactor { name: &'static str, value: f64 },
}

#[derive(Debug)]
pub enum AppError {
    InvalidParameterRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    SourceLoadFailure {
        path: PathBuf,
        reason: String,
    },
    PlaybackUnavailable(String),
    /// Writing the transient WAV or an export failed.
    OutputWrite {
        path: PathBuf,
        source: io::Error,
    },
    /// A figure could not be drawn.
    Render {
        path: PathBuf,
        reason: String,
    },
    Signal(SignalError),
    Wav(hound::Error),
    Json(serde_json::Error),
    Io(io::Error),
}

impl AppError {
    pub fn output(path: &Path, source: io::Error) -> Self {
        AppError::OutputWrite {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Errors the shell reports and then keeps running after. Bare `Io`
    /// only comes from the terminal and stays fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::SourceLoadFailure { .. } | AppError::Io(_))
    }

    /// Ctrl-C while a prompt had the terminal.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, AppError::Io(e) if e.kind() == io::ErrorKind::Interrupted)
    }
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalError::EmptySampleAxis => {
                write!(f, "sample axis is empty")
            }
            SignalError::NonPositiveFactor { name, value } => {
                write!(f, "{name} must be positive and finite, got {value}")
            }
        }
    }
}

impl std::error::Error for SignalError {}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidParameterRange {
                name,
                value,
                min,
                max,
            } => write!(f, "{name} = {value} is outside [{min}, {max}]"),
            AppError::SourceLoadFailure { path, reason } => {
                write!(f, "cannot load {}: {reason}", path.display())
            }
            AppError::PlaybackUnavailable(reason) => {
                write!(f, "playback unavailable: {reason}")
            }
            AppError::OutputWrite { path, source } => {
                write!(f, "cannot write {}: {source}", path.display())
            }
            AppError::Render { path, reason } => {
                write!(f, "cannot draw {}: {reason}", path.display())
            }
            AppError::Signal(e) => write!(f, "signal error: {e}"),
            AppError::Wav(e) => write!(f, "WAV error: {e}"),
            AppError::Json(e) => write!(f, "JSON error: {e}"),
            AppError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::OutputWrite { source, .. } => Some(source),
            AppError::Signal(e) => Some(e),
            AppError::Wav(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SignalError> for AppError {
    fn from(err: SignalError) -> Self {
        AppError::Signal(err)
    }
}

impl From<hound::Error> for AppError {
    fn from(err: hound::Error) -> Self {
        AppError::Wav(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(e) => AppError::Io(e),
        }
    }
}
