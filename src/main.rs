use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};

use wavelab_rs::device::{JackPlayer, Playback, PlayerCommand, SilentPlayback};
use wavelab_rs::error::AppError;
use wavelab_rs::signal::{GaussianNoise, NoiseSource};
use wavelab_rs::ui::{
    self, AudioControl, AudioShell, PlotSize, WaveformControl, WaveformShell,
    WaveformView, print_banner,
};
use wavelab_rs::utils::consts::*;
use wavelab_rs::utils::logging::init_logging;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Plot width in characters
    #[arg(long, global = true, default_value_t = PLOT_WIDTH)]
    plot_width: usize,

    /// Plot height in characters
    #[arg(long, global = true, default_value_t = PLOT_HEIGHT)]
    plot_height: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Line plot of a noisy sinusoid
    Sampler(WaveformArgs),
    /// The same sinusoid drawn as vertical bands of intensity
    Raster(WaveformArgs),
    /// Add noise, scale, resample and play an audio clip
    Audio(AudioArgs),
}

#[derive(Args)]
struct WaveformArgs {
    #[arg(long, default_value_t = waveform_defaults::CYCLE)]
    cycle: f64,

    #[arg(long, default_value_t = waveform_defaults::AMPLITUDE)]
    amplitude: f64,

    /// Number of samples
    #[arg(long, default_value_t = waveform_defaults::SAMPLING as f64)]
    sampling: f64,

    #[arg(long, default_value_t = waveform_defaults::NOISE)]
    noise: f64,

    /// Phase shift in degrees
    #[arg(long, default_value_t = waveform_defaults::PHASE_DEGREES)]
    phase: f64,

    #[arg(long, default_value_t = waveform_defaults::VERTICAL_SHIFT)]
    vertical_shift: f64,

    /// Seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,

    /// Render once and exit
    #[arg(long)]
    once: bool,

    /// Write the rendered data here: SVG figure for `.svg`, JSON otherwise
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[derive(Args)]
struct AudioArgs {
    /// Source clip; prompted for when omitted
    input: Option<PathBuf>,

    /// Transient WAV written on every play
    #[arg(short, long, default_value = OUTPUT_WAV_PATH)]
    output: PathBuf,

    #[arg(long, default_value_t = audio_defaults::SAMPLING_FACTOR)]
    sampling_factor: f64,

    #[arg(long, default_value_t = audio_defaults::NOISE)]
    noise: f64,

    #[arg(long, default_value_t = audio_defaults::AMPLITUDE_FACTOR)]
    amplitude: f64,

    #[arg(long, default_value_t = audio_defaults::SPEED_FACTOR)]
    speed: f64,

    #[arg(long)]
    seed: Option<u64>,

    /// Play once and exit
    #[arg(long)]
    once: bool,

    /// Never open the audio device
    #[arg(long)]
    no_playback: bool,

    /// Write the plotted signal here: SVG figure for `.svg`, JSON otherwise
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn make_noise(seed: Option<u64>) -> Box<dyn NoiseSource> {
    match seed {
        Some(seed) => {
            info!("Noise seed: {}", seed);
            Box::new(GaussianNoise::seeded(seed))
        }
        None => Box::new(GaussianNoise::new()),
    }
}

fn install_ctrlc(
    running: Arc<AtomicBool>,
    stop: Option<crossbeam_channel::Sender<PlayerCommand>>,
) {
    let handler = ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
        if let Some(tx) = &stop {
            let _ = tx.send(PlayerCommand::Stop);
        }
    });
    if let Err(e) = handler {
        warn!("Cannot install Ctrl-C handler: {}", e);
    }
}

fn run_waveform(
    view: WaveformView,
    args: WaveformArgs,
    plot_size: PlotSize,
) -> Result<(), AppError> {
    let mut shell = WaveformShell::new(view, make_noise(args.seed), plot_size);
    let initial = [
        (WaveformControl::Cycle, args.cycle),
        (WaveformControl::Amplitude, args.amplitude),
        (WaveformControl::Sampling, args.sampling),
        (WaveformControl::Noise, args.noise),
        (WaveformControl::Phase, args.phase),
        (WaveformControl::VerticalShift, args.vertical_shift),
    ];
    for (control, value) in initial {
        shell.apply(control, value)?;
    }
    shell.redraw()?;

    if args.once {
        println!("{}", shell.render());
        if let Some(path) = &args.dump {
            shell.export(path)?;
        }
        return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc(running.clone(), None);
    shell.run(&running, args.dump.as_deref())
}

fn run_audio(args: AudioArgs, plot_size: PlotSize) -> Result<(), AppError> {
    let mut stop_sender = None;
    let player: Box<dyn Playback> = if args.no_playback {
        Box::new(SilentPlayback)
    } else {
        match JackPlayer::open() {
            Ok(player) => {
                stop_sender = Some(player.command_sender());
                Box::new(player)
            }
            Err(e) => {
                warn!("{}; sounds will not be played", e);
                Box::new(SilentPlayback)
            }
        }
    };

    let mut shell =
        AudioShell::new(player, make_noise(args.seed), args.output.clone(), plot_size);
    let initial = [
        (AudioControl::SamplingFactor, args.sampling_factor),
        (AudioControl::Noise, args.noise),
        (AudioControl::Amplitude, args.amplitude),
        (AudioControl::Speed, args.speed),
    ];
    for (control, value) in initial {
        shell.set(control, value)?;
    }

    let input = match &args.input {
        Some(path) => path.clone(),
        None => ui::ask_path("Audio file")?,
    };
    shell.load(&input)?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc(running.clone(), stop_sender);

    if args.once {
        shell.play()?;
        println!("{}", shell.render());
        if let Some(path) = &args.dump {
            shell.export(path)?;
        }
        // let the clip finish before the client goes away
        while shell.is_playing() && running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(PLAYBACK_POLL_MS));
        }
        shell.quit();
        return Ok(());
    }

    shell.run(&running, args.dump.as_deref())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    print_banner();

    let plot_size = PlotSize::new(cli.plot_width, cli.plot_height);
    let result = match cli.command {
        Commands::Sampler(args) => run_waveform(WaveformView::Line, args, plot_size),
        Commands::Raster(args) => run_waveform(WaveformView::Raster, args, plot_size),
        Commands::Audio(args) => run_audio(args, plot_size),
    };

    match result {
        Ok(()) => {
            info!("Exiting gracefully...");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
