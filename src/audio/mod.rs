pub mod backend;
pub mod controller;

pub use backend::{AudioBackend, AudioHandle};
pub use controller::PlaybackController;
