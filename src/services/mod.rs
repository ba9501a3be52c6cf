pub mod player;

pub use player::{PlayerHandle, SoundPlayer, SpeakerBackend};
