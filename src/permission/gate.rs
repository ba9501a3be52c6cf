use std::fmt;

use async_trait::async_trait;

/// A capability the screen needs before touching a device or directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Camera,
    GalleryRead,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Camera => write!(f, "camera"),
            Capability::GalleryRead => write!(f, "gallery read"),
        }
    }
}

/// The answer a gate gives once a check has actually run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionDecision {
    Granted,
    Denied,
}

/// What the broker currently knows about a capability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl From<PermissionDecision> for PermissionState {
    fn from(decision: PermissionDecision) -> Self {
        match decision {
            PermissionDecision::Granted => PermissionState::Granted,
            PermissionDecision::Denied => PermissionState::Denied,
        }
    }
}

/// Trait for asking the platform whether a capability is available,
/// prompting the user when the platform supports it.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Checks the capability, surfacing a prompt if one is needed.
    /// Gates report failures as denials rather than errors so callers
    /// only ever branch on the decision.
    async fn check_or_request(&self, capability: Capability) -> PermissionDecision;
}
