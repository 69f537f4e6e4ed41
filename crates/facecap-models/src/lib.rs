//! Shared data models for the FaceCap capture pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Grayscale frames handed to the face classifier and pupil localizer
//! - Face detections, eye regions and pupil positions
//! - Detection statistics snapshots
//! - Capture phases, captured crops and per-frame reports

pub mod capture;
pub mod face;
pub mod frame;
pub mod report;
pub mod session;
pub mod stats;

// Re-export common types
pub use capture::{CapturePhase, CapturePhaseParseError, CapturedImage};
pub use face::{EyePupils, EyeRegion, EyeSide, FaceDetection, PupilPosition};
pub use frame::GrayFrame;
pub use report::FrameReport;
pub use session::SessionId;
pub use stats::DetectionStats;
