pub mod jack;
pub mod player;

pub use player::{JackPlayer, Playback, PlayerCommand, SilentPlayback};
