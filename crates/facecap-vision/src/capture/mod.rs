//! Capture decision and cropping.

pub mod controller;
pub mod cropper;

pub use controller::{CaptureDecision, CaptureStabilityController};
pub use cropper::FrameCropper;
