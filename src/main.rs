mod app;
mod audio;
mod capture;
mod commands;
mod config;
mod error;
mod messages;
mod permission;
mod services;

use app::App;
use audio::PlaybackController;
use capture::DesktopCapture;
use config::Config;
use permission::{DesktopGate, PermissionBroker};
use services::{PlayerHandle, SoundPlayer, SpeakerBackend};

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting snapjam media screen");

    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    // Create LocalSet for !Send futures (needed for SoundPlayer which holds rodio::OutputStream)
    let local = tokio::task::LocalSet::new();

    local.run_until(async move { run_app(config).await }).await
}

async fn run_app(config: Config) -> Result<()> {
    let pictures_dir = config.pictures_dir()?;

    // Create and spawn SoundPlayer (using spawn_local because it's !Send)
    let (player_tx, player_rx) = mpsc::channel(10);
    tokio::task::spawn_local(SoundPlayer::new(player_rx).run());
    let player = PlayerHandle::new(player_tx);

    let backend = SpeakerBackend::new(player, PathBuf::from(&config.sound_clip));
    let controller = PlaybackController::new(Box::new(backend));

    // Resolve cache-once permissions up front
    let gate = DesktopGate::new(pictures_dir.clone());
    let mut permissions = PermissionBroker::new(Box::new(gate), config.permission_policies());
    permissions.prime().await;

    let capture = DesktopCapture::new(config.camera_command.clone(), pictures_dir);

    // Setup command input (stdin reads block, so they get a dedicated thread)
    let (command_tx, command_rx) = mpsc::channel(10);
    commands::spawn_stdin_monitor(command_tx);

    tracing::info!(
        "Ready! Commands: t = take photo, p = pick image, s = play/pause sound, i = status, q = quit"
    );

    App::new(
        config,
        permissions,
        Box::new(capture),
        controller,
        command_rx,
    )
    .run()
    .await
}
