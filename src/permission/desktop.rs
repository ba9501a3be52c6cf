use crate::permission::gate::{Capability, PermissionDecision, PermissionGate};

use std::path::PathBuf;

use ashpd::desktop::camera::Camera;
use async_trait::async_trait;

/// Permission gate backed by the XDG Desktop Portal.
///
/// Camera access goes through the Camera portal, which prompts the user
/// on first use. Gallery access has no portal equivalent, so the gate
/// probes whether the pictures directory is readable.
pub struct DesktopGate {
    pictures_dir: PathBuf,
}

impl DesktopGate {
    pub fn new(pictures_dir: PathBuf) -> Self {
        Self { pictures_dir }
    }

    async fn check_camera(&self) -> PermissionDecision {
        match request_camera_access().await {
            Ok(true) => PermissionDecision::Granted,
            Ok(false) => {
                tracing::warn!("No camera present on this system");
                PermissionDecision::Denied
            }
            Err(ashpd::Error::Response(ashpd::desktop::ResponseError::Cancelled)) => {
                tracing::info!("Camera access denied by user");
                PermissionDecision::Denied
            }
            Err(e) => {
                tracing::warn!("Camera portal request failed: {e}");
                PermissionDecision::Denied
            }
        }
    }

    async fn check_gallery(&self) -> PermissionDecision {
        match tokio::fs::metadata(&self.pictures_dir).await {
            Ok(meta) if meta.is_dir() => PermissionDecision::Granted,
            Ok(_) => {
                tracing::warn!("{} is not a directory", self.pictures_dir.display());
                PermissionDecision::Denied
            }
            Err(e) => {
                tracing::warn!("Cannot access {}: {e}", self.pictures_dir.display());
                PermissionDecision::Denied
            }
        }
    }
}

/// Returns whether a camera is present and the user granted access.
async fn request_camera_access() -> ashpd::Result<bool> {
    let camera = Camera::new().await?;
    if !camera.is_present().await? {
        return Ok(false);
    }
    camera.request_access().await?;
    Ok(true)
}

#[async_trait]
impl PermissionGate for DesktopGate {
    async fn check_or_request(&self, capability: Capability) -> PermissionDecision {
        match capability {
            Capability::Camera => self.check_camera().await,
            Capability::GalleryRead => self.check_gallery().await,
        }
    }
}
