pub mod desktop;
pub mod gate;
pub mod policy;

pub use desktop::DesktopGate;
pub use gate::{Capability, PermissionDecision, PermissionGate, PermissionState};
pub use policy::{PermissionBroker, RefreshPolicy};
