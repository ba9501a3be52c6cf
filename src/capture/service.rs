use crate::error::CaptureError;

use async_trait::async_trait;

/// Where a capture request gets its image from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureMode {
    Camera,
    Library,
}

/// How a capture request ended.
///
/// A dismissed dialog or an aborted shot is a `Cancelled`, not an error;
/// only a broken capture pipeline produces `Err`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    Accepted(String),
    Cancelled,
}

/// Trait for acquiring an image from the camera or the image library.
#[async_trait]
pub trait CaptureService: Send + Sync {
    async fn request_capture(&self, mode: CaptureMode) -> Result<CaptureOutcome, CaptureError>;
}
