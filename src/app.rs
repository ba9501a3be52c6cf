use crate::audio::PlaybackController;
use crate::capture::{CaptureMode, CaptureOutcome, CaptureService};
use crate::config::Config;
use crate::messages::ScreenCommand;
use crate::permission::{Capability, PermissionBroker, PermissionDecision};

use anyhow::Result;
use tokio::sync::mpsc;

/// The media screen: one selected image and one optional sound clip.
pub struct App {
    config: Config,
    permissions: PermissionBroker,
    capture: Box<dyn CaptureService>,
    controller: PlaybackController,
    image: Option<String>,
    commands: mpsc::Receiver<ScreenCommand>,
}

impl App {
    pub fn new(
        config: Config,
        permissions: PermissionBroker,
        capture: Box<dyn CaptureService>,
        controller: PlaybackController,
        commands: mpsc::Receiver<ScreenCommand>,
    ) -> Self {
        Self {
            config,
            permissions,
            capture,
            controller,
            image: None,
            commands,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        loop {
            tracing::debug!("Main loop: waiting for command");
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(ScreenCommand::Quit) | None => break,
                        Some(command) => {
                            if let Err(e) = self.handle_command(command).await {
                                tracing::error!("Error handling command: {}", e);
                            }
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    break;
                }
            }
        }

        // The clip must not outlive the screen, whatever ended the loop.
        if let Err(e) = self.controller.release().await {
            tracing::warn!("Failed to release sound clip: {}", e);
        }
        tracing::info!("Screen closed");
        Ok(())
    }

    async fn handle_command(&mut self, command: ScreenCommand) -> Result<()> {
        match command {
            ScreenCommand::TakePhoto => self.take_photo().await,
            ScreenCommand::PickImage => self.pick_image().await,
            ScreenCommand::ToggleSound => self.toggle_sound().await,
            ScreenCommand::Status => {
                self.log_status();
                Ok(())
            }
            // Quit is intercepted by the run loop.
            ScreenCommand::Quit => Ok(()),
        }
    }

    async fn take_photo(&mut self) -> Result<()> {
        if self.permissions.resolve(Capability::Camera).await == PermissionDecision::Denied {
            tracing::warn!("Permission to access camera is required");
            return Ok(());
        }

        self.capture_into_image(CaptureMode::Camera).await
    }

    async fn pick_image(&mut self) -> Result<()> {
        if self.permissions.resolve(Capability::GalleryRead).await == PermissionDecision::Denied {
            tracing::warn!("No access to gallery");
            return Ok(());
        }

        self.capture_into_image(CaptureMode::Library).await
    }

    async fn capture_into_image(&mut self, mode: CaptureMode) -> Result<()> {
        match self.capture.request_capture(mode).await? {
            CaptureOutcome::Accepted(uri) => {
                tracing::info!("Image selected: {}", uri);
                self.set_image(uri);
            }
            CaptureOutcome::Cancelled => tracing::debug!("Capture cancelled"),
        }

        Ok(())
    }

    fn set_image(&mut self, uri: String) {
        if self.config.preview_images {
            if let Err(e) = open::that_detached(&uri) {
                tracing::warn!("Failed to open image preview: {}", e);
            }
        }
        self.image = Some(uri);
    }

    async fn toggle_sound(&mut self) -> Result<()> {
        // Playback trouble stays on this screen; the command loop keeps going.
        match self.controller.toggle().await {
            Ok(true) => tracing::info!("Playing sound"),
            Ok(false) => tracing::info!("Sound paused"),
            Err(e) => tracing::error!("Error playing sound: {}", e),
        }

        Ok(())
    }

    fn log_status(&self) {
        let image = self.image.as_deref().unwrap_or("none");
        let sound = if self.controller.is_playing() {
            "playing"
        } else {
            "paused"
        };
        tracing::info!("Image: {} | Sound: {}", image, sound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::audio::{AudioBackend, AudioHandle};
    use crate::error::{CaptureError, PlaybackError};
    use crate::permission::PermissionGate;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    struct StubGate {
        decision: PermissionDecision,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PermissionGate for StubGate {
        async fn check_or_request(&self, _capability: Capability) -> PermissionDecision {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.decision
        }
    }

    struct StubCapture {
        outcome: CaptureOutcome,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CaptureService for StubCapture {
        async fn request_capture(
            &self,
            _mode: CaptureMode,
        ) -> Result<CaptureOutcome, CaptureError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome.clone())
        }
    }

    struct StubBackend {
        unloads: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl AudioBackend for StubBackend {
        async fn load_clip(&mut self) -> Result<Box<dyn AudioHandle>, PlaybackError> {
            if self.fail {
                return Err(PlaybackError::ResourceUnavailable {
                    reason: "no audio output".to_string(),
                });
            }
            Ok(Box::new(StubHandle {
                unloads: self.unloads.clone(),
            }))
        }
    }

    struct StubHandle {
        unloads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AudioHandle for StubHandle {
        async fn pause(&mut self) -> Result<(), PlaybackError> {
            Ok(())
        }

        async fn resume(&mut self) -> Result<(), PlaybackError> {
            Ok(())
        }

        async fn unload(&mut self) -> Result<(), PlaybackError> {
            self.unloads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct TestScreen {
        app: App,
        tx: mpsc::Sender<ScreenCommand>,
        gate_calls: Arc<AtomicUsize>,
        capture_calls: Arc<AtomicUsize>,
        unloads: Arc<AtomicUsize>,
    }

    fn test_screen(decision: PermissionDecision, outcome: CaptureOutcome) -> TestScreen {
        test_screen_with(decision, outcome, false)
    }

    fn test_screen_with(
        decision: PermissionDecision,
        outcome: CaptureOutcome,
        fail_audio: bool,
    ) -> TestScreen {
        let gate_calls = Arc::new(AtomicUsize::new(0));
        let capture_calls = Arc::new(AtomicUsize::new(0));
        let unloads = Arc::new(AtomicUsize::new(0));

        let config = Config {
            preview_images: false,
            ..Default::default()
        };
        let permissions = PermissionBroker::new(
            Box::new(StubGate {
                decision,
                calls: gate_calls.clone(),
            }),
            config.permission_policies(),
        );
        let capture = Box::new(StubCapture {
            outcome,
            calls: capture_calls.clone(),
        });
        let controller = PlaybackController::new(Box::new(StubBackend {
            unloads: unloads.clone(),
            fail: fail_audio,
        }));
        let (tx, rx) = mpsc::channel(10);

        TestScreen {
            app: App::new(config, permissions, capture, controller, rx),
            tx,
            gate_calls,
            capture_calls,
            unloads,
        }
    }

    #[tokio::test]
    async fn test_denied_camera_skips_capture() {
        let mut screen = test_screen(
            PermissionDecision::Denied,
            CaptureOutcome::Accepted("file:///pic.png".to_string()),
        );

        screen.app.handle_command(ScreenCommand::TakePhoto).await.unwrap();

        assert_eq!(screen.capture_calls.load(Ordering::SeqCst), 0);
        assert_eq!(screen.app.image, None);
    }

    #[tokio::test]
    async fn test_accepted_capture_sets_image() {
        let mut screen = test_screen(
            PermissionDecision::Granted,
            CaptureOutcome::Accepted("file:///pic.png".to_string()),
        );

        screen.app.handle_command(ScreenCommand::TakePhoto).await.unwrap();

        assert_eq!(screen.capture_calls.load(Ordering::SeqCst), 1);
        assert_eq!(screen.app.image.as_deref(), Some("file:///pic.png"));
    }

    #[tokio::test]
    async fn test_cancelled_capture_keeps_previous_image() {
        let mut screen = test_screen(PermissionDecision::Granted, CaptureOutcome::Cancelled);
        screen.app.image = Some("file:///old.png".to_string());

        screen.app.handle_command(ScreenCommand::PickImage).await.unwrap();

        assert_eq!(screen.app.image.as_deref(), Some("file:///old.png"));
    }

    #[tokio::test]
    async fn test_gallery_denial_is_cached_across_picks() {
        let mut screen = test_screen(PermissionDecision::Denied, CaptureOutcome::Cancelled);

        screen.app.handle_command(ScreenCommand::PickImage).await.unwrap();
        screen.app.handle_command(ScreenCommand::PickImage).await.unwrap();

        assert_eq!(screen.gate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(screen.capture_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_camera_permission_is_rechecked_every_time() {
        let mut screen = test_screen(PermissionDecision::Denied, CaptureOutcome::Cancelled);

        screen.app.handle_command(ScreenCommand::TakePhoto).await.unwrap();
        screen.app.handle_command(ScreenCommand::TakePhoto).await.unwrap();

        assert_eq!(screen.gate_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_toggle_failure_keeps_screen_alive() {
        let mut screen =
            test_screen_with(PermissionDecision::Granted, CaptureOutcome::Cancelled, true);

        screen.app.handle_command(ScreenCommand::ToggleSound).await.unwrap();

        assert!(!screen.app.controller.is_playing());
    }

    #[tokio::test]
    async fn test_run_releases_clip_on_quit() {
        let screen = test_screen(PermissionDecision::Granted, CaptureOutcome::Cancelled);

        screen.tx.send(ScreenCommand::ToggleSound).await.unwrap();
        screen.tx.send(ScreenCommand::Quit).await.unwrap();
        screen.app.run().await.unwrap();

        assert_eq!(screen.unloads.load(Ordering::SeqCst), 1);
    }
}
