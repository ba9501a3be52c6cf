use crate::error::PlaybackError;
use async_trait::async_trait;

/// Trait for the host audio subsystem.
///
/// An implementation is bound to one fixed clip and hands out at most one
/// live handle per `load_clip` call. Loading decodes the clip and starts
/// playback in the same step; pause state is tracked by the caller.
#[async_trait]
pub trait AudioBackend: Send {
    /// Load the clip and start playing it.
    async fn load_clip(&mut self) -> Result<Box<dyn AudioHandle>, PlaybackError>;
}

/// One loaded, host-managed audio resource.
///
/// Implementations must also release the underlying resource when dropped
/// without an explicit `unload`, so that abnormal teardown cannot leak a
/// decoded clip.
#[async_trait]
pub trait AudioHandle: Send {
    async fn pause(&mut self) -> Result<(), PlaybackError>;

    async fn resume(&mut self) -> Result<(), PlaybackError>;

    /// Release the decoded resource. At most one release reaches the host
    /// per handle; later calls are no-ops.
    async fn unload(&mut self) -> Result<(), PlaybackError>;
}
