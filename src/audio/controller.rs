use crate::audio::{AudioBackend, AudioHandle};
use crate::error::PlaybackError;

/// Owns the screen's single sound handle.
///
/// The controller creates the handle lazily on the first toggle, flips
/// between playing and paused on later toggles, and guarantees the resource
/// is unloaded when the screen goes away. At most one handle is live per
/// controller; a toggle while none exists creates-then-plays instead of
/// failing.
pub struct PlaybackController {
    backend: Box<dyn AudioBackend>,
    handle: Option<Box<dyn AudioHandle>>,
    playing: bool,
}

impl PlaybackController {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            handle: None,
            playing: false,
        }
    }

    /// Play/pause toggle. Returns the new playing state.
    ///
    /// Issues exactly one backend call per invocation: a create when no
    /// handle exists (playback starts as part of creation), otherwise a
    /// pause or a resume on the existing handle. If creation fails the
    /// controller stays idle and the next toggle retries.
    pub async fn toggle(&mut self) -> Result<bool, PlaybackError> {
        if self.handle.is_none() {
            let handle = self.backend.load_clip().await?;
            self.handle = Some(handle);
            self.playing = true;
        } else if self.playing {
            if let Some(handle) = self.handle.as_mut() {
                handle.pause().await?;
            }
            self.playing = false;
        } else {
            if let Some(handle) = self.handle.as_mut() {
                handle.resume().await?;
            }
            self.playing = true;
        }

        Ok(self.playing)
    }

    /// Unload the clip if one is loaded. Idempotent; a toggle after release
    /// starts over with a fresh handle.
    pub async fn release(&mut self) -> Result<(), PlaybackError> {
        self.playing = false;
        if let Some(mut handle) = self.handle.take() {
            handle.unload().await?;
        }
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}
