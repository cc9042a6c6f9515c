/// 日志级别（可被 RUST_LOG 覆盖）
pub const LOG_LEVEL: &str = "info";

/// JACK 客户端名称
pub const JACK_CLIENT_NAME: &str = "wavelab";

/// 输出端口名称
pub const OUTPUT_PORT_NAME: &str = "wl_out";

/// Transient file the audio shell writes before every play action
pub const OUTPUT_WAV_PATH: &str = "output.wav";

/// Upper bound of the waveform x axis
pub const X_DOMAIN_MAX: f64 = 1000.0;

/// Valid luma range of waveform samples
pub const LUMA_MIN: f64 = 0.0;
pub const LUMA_MAX: f64 = 255.0;

/// Terminal plot size in characters
pub const PLOT_WIDTH: usize = 72;
pub const PLOT_HEIGHT: usize = 20;

/// Spinner refresh interval (ms)
pub const PROGRESS_UPDATE_INTERVAL_MS: u64 = 80;

/// How often `--once` checks whether playback has finished (ms)
pub const PLAYBACK_POLL_MS: u64 = 50;

// ============================================================================
// Slider ranges: (min, max, step)
// ============================================================================

pub mod waveform_ranges {
    pub const CYCLE: (f64, f64, f64) = (1.0, 100.0, 1.0);
    pub const AMPLITUDE: (f64, f64, f64) = (1.0, 127.0, 1.0);
    /// Line plot sampling
    pub const SAMPLING_LINE: (f64, f64, f64) = (5.0, 1000.0, 5.0);
    /// Raster sampling, the image is sampling x sampling
    pub const SAMPLING_RASTER: (f64, f64, f64) = (10.0, 1000.0, 10.0);
    pub const NOISE: (f64, f64, f64) = (0.0, 50.0, 1.0);
    /// Degrees, converted to radians on assignment
    pub const PHASE_DEGREES: (f64, f64, f64) = (0.0, 360.0, 1.0);
    pub const VERTICAL_SHIFT: (f64, f64, f64) = (0.0, 255.0, 1.0);
}

pub mod waveform_defaults {
    pub const CYCLE: f64 = 1.0;
    pub const AMPLITUDE: f64 = 127.0;
    pub const SAMPLING: usize = 1000;
    pub const NOISE: f64 = 0.0;
    pub const PHASE_DEGREES: f64 = 0.0;
    pub const VERTICAL_SHIFT: f64 = 127.0;
}

pub mod audio_ranges {
    pub const SAMPLING_FACTOR: (f64, f64, f64) = (0.1, 10.0, 0.1);
    /// PCM units
    pub const NOISE: (f64, f64, f64) = (0.0, 1000.0, 10.0);
    pub const AMPLITUDE_FACTOR: (f64, f64, f64) = (0.1, 2.0, 0.01);
    pub const SPEED_FACTOR: (f64, f64, f64) = (0.5, 2.0, 0.1);
}

pub mod audio_defaults {
    pub const SAMPLING_FACTOR: f64 = 1.0;
    pub const NOISE: f64 = 0.0;
    pub const AMPLITUDE_FACTOR: f64 = 1.0;
    pub const SPEED_FACTOR: f64 = 1.0;
}
