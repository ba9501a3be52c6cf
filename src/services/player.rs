use crate::audio::{AudioBackend, AudioHandle};
use crate::error::PlaybackError;
use crate::messages::PlayerCommand;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rodio::OutputStreamBuilder;
use tokio::sync::{mpsc, oneshot};

/// Drives rodio playback for the screen.
///
/// This service:
/// - Opens the output stream lazily on the first load (a failed open can be
///   retried on the next load)
/// - Holds at most one decoded clip sink, tagged with a generation id so
///   stale pause/resume/unload commands are ignored
/// - Ends when all command senders drop, releasing sink and stream
///
/// Note: This service holds rodio::OutputStream which is !Send, so it must
/// be spawned on a LocalSet using tokio::task::spawn_local.
pub struct SoundPlayer {
    cmd_rx: mpsc::Receiver<PlayerCommand>,
    stream: Option<rodio::OutputStream>,
    current: Option<LoadedClip>,
    next_id: u64,
}

struct LoadedClip {
    id: u64,
    sink: rodio::Sink,
}

impl SoundPlayer {
    pub fn new(cmd_rx: mpsc::Receiver<PlayerCommand>) -> Self {
        Self {
            cmd_rx,
            stream: None,
            current: None,
            next_id: 1,
        }
    }

    pub async fn run(mut self) {
        while let Some(cmd) = self.cmd_rx.recv().await {
            self.handle_command(cmd);
        }
        tracing::debug!("Sound player shutting down");
    }

    fn handle_command(&mut self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::Load { clip, reply } => {
                let _ = reply.send(self.load(&clip));
            }
            PlayerCommand::Pause { id, reply } => {
                let _ = reply.send(self.pause(id));
            }
            PlayerCommand::Resume { id, reply } => {
                let _ = reply.send(self.resume(id));
            }
            PlayerCommand::Unload { id } => self.unload(id),
        }
    }

    fn load(&mut self, clip: &Path) -> Result<u64, PlaybackError> {
        let file = open_clip(clip)?;

        if self.stream.is_none() {
            let stream = OutputStreamBuilder::open_default_stream().map_err(|e| {
                PlaybackError::ResourceUnavailable {
                    reason: format!("failed to open audio output: {e}"),
                }
            })?;
            self.stream = Some(stream);
        }
        let Some(stream) = self.stream.as_ref() else {
            return Err(PlaybackError::ResourceUnavailable {
                reason: "audio output unavailable".to_string(),
            });
        };

        // Decodes the clip and starts playback in one step.
        let sink = rodio::play(stream.mixer(), BufReader::new(file)).map_err(|e| {
            PlaybackError::ResourceUnavailable {
                reason: format!("failed to play clip {}: {e}", clip.display()),
            }
        })?;

        let id = self.next_id;
        self.next_id += 1;

        if let Some(old) = self.current.replace(LoadedClip { id, sink }) {
            tracing::debug!("Superseding loaded clip {}", old.id);
            old.sink.stop();
        }

        tracing::info!("Loaded sound clip {} (handle {})", clip.display(), id);
        Ok(id)
    }

    fn pause(&mut self, id: u64) -> Result<(), PlaybackError> {
        match self.current.as_ref() {
            Some(clip) if clip.id == id => {
                clip.sink.pause();
                Ok(())
            }
            _ => {
                tracing::debug!("Ignoring pause for stale handle {id}");
                Ok(())
            }
        }
    }

    fn resume(&mut self, id: u64) -> Result<(), PlaybackError> {
        match self.current.as_ref() {
            Some(clip) if clip.id == id => {
                clip.sink.play();
                Ok(())
            }
            _ => {
                tracing::debug!("Ignoring resume for stale handle {id}");
                Ok(())
            }
        }
    }

    fn unload(&mut self, id: u64) {
        if self.current.as_ref().is_some_and(|clip| clip.id == id) {
            if let Some(clip) = self.current.take() {
                clip.sink.stop();
            }
            tracing::info!("Unloaded sound handle {id}");
        } else {
            tracing::debug!("Ignoring unload for stale handle {id}");
        }
    }
}

fn open_clip(path: &Path) -> Result<File, PlaybackError> {
    File::open(path)
        .or_else(|_| File::open(Path::new("assets").join(path)))
        .or_else(|_| File::open(Path::new("/usr/share/snapjam/assets").join(path)))
        .map_err(|e| PlaybackError::ResourceUnavailable {
            reason: format!("cannot open sound clip {}: {e}", path.display()),
        })
}

/// Handle for communicating with the sound player task.
#[derive(Clone)]
pub struct PlayerHandle {
    tx: mpsc::Sender<PlayerCommand>,
}

impl PlayerHandle {
    pub fn new(tx: mpsc::Sender<PlayerCommand>) -> Self {
        Self { tx }
    }

    pub async fn load(&self, clip: PathBuf) -> Result<u64, PlaybackError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(PlayerCommand::Load { clip, reply })
            .await
            .map_err(|_| PlaybackError::PlayerGone)?;
        rx.await.map_err(|_| PlaybackError::PlayerGone)?
    }

    pub async fn pause(&self, id: u64) -> Result<(), PlaybackError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(PlayerCommand::Pause { id, reply })
            .await
            .map_err(|_| PlaybackError::PlayerGone)?;
        rx.await.map_err(|_| PlaybackError::PlayerGone)?
    }

    pub async fn resume(&self, id: u64) -> Result<(), PlaybackError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(PlayerCommand::Resume { id, reply })
            .await
            .map_err(|_| PlaybackError::PlayerGone)?;
        rx.await.map_err(|_| PlaybackError::PlayerGone)?
    }

    pub async fn unload(&self, id: u64) -> Result<(), PlaybackError> {
        self.tx
            .send(PlayerCommand::Unload { id })
            .await
            .map_err(|_| PlaybackError::PlayerGone)
    }

    /// Best-effort unload for drop paths; never waits.
    pub fn unload_nowait(&self, id: u64) {
        let _ = self.tx.try_send(PlayerCommand::Unload { id });
    }
}

/// Audio backend that plays the configured clip through the speakers.
pub struct SpeakerBackend {
    player: PlayerHandle,
    clip: PathBuf,
}

impl SpeakerBackend {
    pub fn new(player: PlayerHandle, clip: PathBuf) -> Self {
        Self { player, clip }
    }
}

#[async_trait]
impl AudioBackend for SpeakerBackend {
    async fn load_clip(&mut self) -> Result<Box<dyn AudioHandle>, PlaybackError> {
        let id = self.player.load(self.clip.clone()).await?;
        Ok(Box::new(ClipHandle {
            player: self.player.clone(),
            id,
            unloaded: false,
        }))
    }
}

/// One loaded clip in the player task, identified by its generation id.
struct ClipHandle {
    player: PlayerHandle,
    id: u64,
    unloaded: bool,
}

#[async_trait]
impl AudioHandle for ClipHandle {
    async fn pause(&mut self) -> Result<(), PlaybackError> {
        self.player.pause(self.id).await
    }

    async fn resume(&mut self) -> Result<(), PlaybackError> {
        self.player.resume(self.id).await
    }

    async fn unload(&mut self) -> Result<(), PlaybackError> {
        self.unloaded = true;
        self.player.unload(self.id).await
    }
}

impl Drop for ClipHandle {
    fn drop(&mut self) {
        // The player ignores the duplicate if an explicit unload already ran.
        if !self.unloaded {
            self.player.unload_nowait(self.id);
        }
    }
}
