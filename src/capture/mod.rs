pub mod desktop;
pub mod service;

pub use desktop::DesktopCapture;
pub use service::{CaptureMode, CaptureOutcome, CaptureService};
