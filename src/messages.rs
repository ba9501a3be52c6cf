use crate::error::PlaybackError;
use std::path::PathBuf;
use tokio::sync::oneshot;

/// Commands for the sound player task.
pub enum PlayerCommand {
    Load {
        clip: PathBuf,
        reply: oneshot::Sender<Result<u64, PlaybackError>>,
    },
    Pause {
        id: u64,
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    Resume {
        id: u64,
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    /// No reply channel: also issued from handle drop, which cannot wait.
    Unload { id: u64 },
}

/// User actions parsed from command input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenCommand {
    TakePhoto,
    PickImage,
    ToggleSound,
    Status,
    Quit,
}
