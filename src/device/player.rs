use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{error, info, warn};

use crate::audio::wav::read_wav;
use crate::device::jack::{
    connect_output_to_system_inputs, print_jack_info,
};
use crate::error::AppError;
use crate::signal::{AudioBuffer, resample_fft};
use crate::utils::consts::{JACK_CLIENT_NAME, OUTPUT_PORT_NAME};

/// Something that can play a WAV file written by the audio shell.
pub trait Playback {
    /// Replaces whatever is playing with the file at `path`.
    fn play(&mut self, path: &Path) -> Result<(), AppError>;
    fn stop(&mut self);
    /// Stops and releases the device. Further calls are no-ops.
    fn quit(&mut self);

    /// Whether queued samples are still being played.
    fn is_playing(&self) -> bool {
        false
    }
}

/// Stand-in used when no audio server is reachable.
#[derive(Default)]
pub struct SilentPlayback;

impl Playback for SilentPlayback {
    fn play(&mut self, path: &Path) -> Result<(), AppError> {
        warn!("No playback device, skipping {}", path.display());
        Ok(())
    }

    fn stop(&mut self) {}

    fn quit(&mut self) {}
}

pub enum PlayerCommand {
    Play(VecDeque<f32>),
    Stop,
}

/// Replaced queues waiting to be freed by the control thread.
const SPENT_QUEUE_CAPACITY: usize = 4;

/// Realtime side: drains commands, then feeds queued samples to the port.
pub struct PlaybackProcess {
    out_port: jack::Port<jack::AudioOut>,
    commands: Receiver<PlayerCommand>,
    spent: Sender<VecDeque<f32>>,
    queue: VecDeque<f32>,
    remaining: Arc<AtomicUsize>,
}

impl jack::ProcessHandler for PlaybackProcess {
    fn process(
        &mut self,
        _: &jack::Client,
        ps: &jack::ProcessScope,
    ) -> jack::Control {
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    apply_command(&mut self.queue, command, &self.spent)
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.queue.clear();
                    break;
                }
            }
        }

        let out_buffer = self.out_port.as_mut_slice(ps);
        render_block(&mut self.queue, out_buffer);
        self.remaining
            .store(self.queue.len(), Ordering::Relaxed);

        jack::Control::Continue
    }
}

/// Swaps in a new queue or clears the current one without freeing memory
/// on the calling thread; the replaced queue goes back over `spent`.
pub fn apply_command(
    queue: &mut VecDeque<f32>,
    command: PlayerCommand,
    spent: &Sender<VecDeque<f32>>,
) {
    match command {
        PlayerCommand::Play(mut samples) => {
            std::mem::swap(queue, &mut samples);
            // full only if the control thread stopped draining
            let _ = spent.try_send(samples);
        }
        PlayerCommand::Stop => queue.clear(),
    }
}

/// Copies queued samples into `out`, padding with silence.
pub fn render_block(queue: &mut VecDeque<f32>, out: &mut [f32]) {
    for out_sample in out.iter_mut() {
        *out_sample = queue.pop_front().unwrap_or(0.0);
    }
}

/// Converts a buffer to device floats at the device rate.
pub fn prepare_for_device(buffer: &AudioBuffer, device_rate: u32) -> Vec<f32> {
    if buffer.sample_rate == device_rate || buffer.sample_rate == 0 {
        return buffer.to_f32();
    }
    let target = (buffer.len() as f64 * device_rate as f64
        / buffer.sample_rate as f64)
        .round() as usize;
    let input: Vec<f64> = buffer
        .samples
        .iter()
        .map(|&s| s as f64)
        .collect();
    resample_fft(&input, target)
        .into_iter()
        .map(|s| (s / 32768.0).clamp(-1.0, 1.0) as f32)
        .collect()
}

/// JACK client with one mono output port.
pub struct JackPlayer {
    client: Option<jack::AsyncClient<(), PlaybackProcess>>,
    commands: Sender<PlayerCommand>,
    spent: Receiver<VecDeque<f32>>,
    sample_rate: u32,
    remaining: Arc<AtomicUsize>,
}

impl JackPlayer {
    pub fn open() -> Result<Self, AppError> {
        let unavailable = |e: jack::Error| AppError::PlaybackUnavailable(e.to_string());

        let (client, status) = jack::Client::new(
            JACK_CLIENT_NAME,
            jack::ClientOptions::NO_START_SERVER,
        )
        .map_err(unavailable)?;
        info!("JACK client status: {:?}", status);
        let (sample_rate, _buffer_size) = print_jack_info(&client);

        let out_port = client
            .register_port(OUTPUT_PORT_NAME, jack::AudioOut::default())
            .map_err(unavailable)?;
        let out_port_name = out_port.name().map_err(unavailable)?;

        let (tx, rx) = crossbeam_channel::unbounded::<PlayerCommand>();
        let (spent_tx, spent_rx) =
            crossbeam_channel::bounded::<VecDeque<f32>>(SPENT_QUEUE_CAPACITY);
        let remaining = Arc::new(AtomicUsize::new(0));
        let process = PlaybackProcess {
            out_port,
            commands: rx,
            spent: spent_tx,
            queue: VecDeque::new(),
            remaining: remaining.clone(),
        };

        let active_client = client
            .activate_async((), process)
            .map_err(unavailable)?;
        connect_output_to_system_inputs(active_client.as_client(), &out_port_name);

        Ok(Self {
            client: Some(active_client),
            commands: tx,
            spent: spent_rx,
            sample_rate: sample_rate as u32,
            remaining,
        })
    }

    /// Sender usable from a signal handler to silence the port.
    pub fn command_sender(&self) -> Sender<PlayerCommand> {
        self.commands.clone()
    }

    fn free_spent(&self) {
        while self.spent.try_recv().is_ok() {}
    }
}

impl Playback for JackPlayer {
    fn play(&mut self, path: &Path) -> Result<(), AppError> {
        if self.client.is_none() {
            return Err(AppError::PlaybackUnavailable(
                "player already closed".to_string(),
            ));
        }
        self.free_spent();
        let buffer = read_wav(path)?;
        let samples = prepare_for_device(&buffer, self.sample_rate);
        let len = samples.len();
        info!(
            "Playing {} ({} samples at {} Hz)",
            path.display(),
            len,
            self.sample_rate
        );
        self.commands
            .send(PlayerCommand::Play(VecDeque::from(samples)))
            .map_err(|e| AppError::PlaybackUnavailable(e.to_string()))?;
        // the process callback corrects this on its next cycle
        self.remaining.store(len, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&mut self) {
        if self.commands.send(PlayerCommand::Stop).is_ok() {
            info!("Playback stopped");
        }
    }

    fn quit(&mut self) {
        self.stop();
        if let Some(active_client) = self.client.take() {
            info!("Closing JACK client...");
            if let Err(err) = active_client.deactivate() {
                error!("Error deactivating client: {}", err);
            }
        }
        self.remaining.store(0, Ordering::Relaxed);
        self.free_spent();
    }

    fn is_playing(&self) -> bool {
        self.client.is_some() && self.remaining.load(Ordering::Relaxed) > 0
    }
}

impl Drop for JackPlayer {
    fn drop(&mut self) {
        self.quit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_block_pads_with_silence() {
        let mut queue = VecDeque::from(vec![0.1, 0.2, 0.3]);
        let mut out = [9.0f32; 5];
        render_block(&mut queue, &mut out);
        assert_eq!(out, [0.1, 0.2, 0.3, 0.0, 0.0]);
        assert!(queue.is_empty());

        render_block(&mut queue, &mut out);
        assert_eq!(out, [0.0; 5]);
    }

    #[test]
    fn replaced_queue_is_handed_back_not_dropped() {
        let (spent_tx, spent_rx) = crossbeam_channel::bounded(1);
        let mut queue = VecDeque::from(vec![0.5f32; 16]);

        apply_command(
            &mut queue,
            PlayerCommand::Play(VecDeque::from(vec![0.25; 4])),
            &spent_tx,
        );
        assert_eq!(queue, VecDeque::from(vec![0.25; 4]));
        assert_eq!(spent_rx.try_recv().unwrap().len(), 16);

        let capacity = queue.capacity();
        apply_command(&mut queue, PlayerCommand::Stop, &spent_tx);
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), capacity);
        assert!(spent_rx.try_recv().is_err());
    }

    #[test]
    fn silent_playback_is_never_playing() {
        let mut player = SilentPlayback;
        player.play(Path::new("output.wav")).unwrap();
        assert!(!player.is_playing());
    }

    #[test]
    fn device_rate_conversion_keeps_duration() {
        let buffer = AudioBuffer::new(vec![1000; 4410], 44100);
        let samples = prepare_for_device(&buffer, 48000);
        assert_eq!(samples.len(), 4800);
        assert!(
            samples
                .iter()
                .all(|&s| (s - 1000.0 / 32768.0).abs() < 1e-4)
        );

        let same = prepare_for_device(&buffer, 44100);
        assert_eq!(same.len(), 4410);
    }

    #[test]
    fn silent_playback_accepts_everything() {
        let mut player = SilentPlayback;
        assert!(player.play(Path::new("output.wav")).is_ok());
        player.stop();
        player.quit();
    }
}
