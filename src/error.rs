use thiserror::Error;

/// Failures of the audio subsystem.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The clip could not be loaded or driven: missing asset, no output
    /// device, or an undecodable file. Non-fatal; the next toggle retries.
    #[error("audio resource unavailable: {reason}")]
    ResourceUnavailable { reason: String },

    /// The sound player task has shut down.
    #[error("sound player task is gone")]
    PlayerGone,
}

/// Failures of image acquisition. A user backing out of a dialog is not an
/// error (see `CaptureOutcome::Cancelled`).
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to launch capture command: {0}")]
    Launch(#[from] std::io::Error),

    #[error("capture command exited with {status}: {stderr}")]
    CommandFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("file chooser portal request failed: {0}")]
    Portal(#[from] ashpd::Error),
}
