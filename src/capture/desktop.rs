use crate::capture::service::{CaptureMode, CaptureOutcome, CaptureService};
use crate::error::CaptureError;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use ashpd::desktop::file_chooser::{FileFilter, SelectedFiles};
use async_trait::async_trait;
use tokio::process::Command;

/// Capture service for desktop sessions.
///
/// Library picks go through the XDG file chooser portal. Camera shots run
/// a configurable shell command that writes a JPEG to the pictures
/// directory, with `{output}` in the template replaced by the target path.
pub struct DesktopCapture {
    camera_command: String,
    pictures_dir: PathBuf,
}

impl DesktopCapture {
    pub fn new(camera_command: String, pictures_dir: PathBuf) -> Self {
        Self {
            camera_command,
            pictures_dir,
        }
    }

    async fn pick_from_library(&self) -> Result<CaptureOutcome, CaptureError> {
        let selected = SelectedFiles::open_file()
            .title("Pick an image")
            .accept_label("Select")
            .modal(true)
            .multiple(false)
            .filter(FileFilter::new("Images").mimetype("image/*"))
            .send()
            .await
            .and_then(|request| request.response());

        match selected {
            Ok(files) => match files.uris().first() {
                Some(uri) => Ok(CaptureOutcome::Accepted(uri.to_string())),
                None => Ok(CaptureOutcome::Cancelled),
            },
            Err(ashpd::Error::Response(ashpd::desktop::ResponseError::Cancelled)) => {
                Ok(CaptureOutcome::Cancelled)
            }
            Err(e) => Err(CaptureError::Portal(e)),
        }
    }

    async fn shoot_camera(&self) -> Result<CaptureOutcome, CaptureError> {
        let output_path = self
            .pictures_dir
            .join(format!("snapjam-{}.jpg", epoch_millis()));
        let command = expand_camera_command(&self.camera_command, &output_path);

        tracing::debug!("Running camera command: {command}");
        let child = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .spawn()?;
        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::CommandFailed {
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        // Some capture tools exit zero when the user aborts the shot.
        if tokio::fs::metadata(&output_path).await.is_err() {
            tracing::info!("Camera command produced no image");
            return Ok(CaptureOutcome::Cancelled);
        }

        Ok(CaptureOutcome::Accepted(
            output_path.to_string_lossy().into_owned(),
        ))
    }
}

#[async_trait]
impl CaptureService for DesktopCapture {
    async fn request_capture(&self, mode: CaptureMode) -> Result<CaptureOutcome, CaptureError> {
        match mode {
            CaptureMode::Camera => self.shoot_camera().await,
            CaptureMode::Library => self.pick_from_library().await,
        }
    }
}

fn expand_camera_command(template: &str, output: &Path) -> String {
    template.replace("{output}", &shell_quote(&output.to_string_lossy()))
}

fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}
