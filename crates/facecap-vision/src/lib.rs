//! Face capture pipeline.
//!
//! This crate turns a stream of RGBA camera frames into a single stable
//! face crop:
//! - Green-weighted luminance conversion into a reused buffer
//! - Face detection with temporal memory, IoU clustering and a confidence floor
//! - Eye region derivation and validated pupil localization
//! - Per-threshold face count statistics
//! - A warm-up plus evaluation-window state machine that fires one capture
//! - PNG crop of the first detected face
//!
//! The face classifier and landmark model are external; plug them in through
//! [`FaceClassifier`] and [`LandmarkLocalizer`].
//!
//! # Example
//! ```rust,no_run
//! use std::time::Duration;
//! use facecap_vision::{CaptureSession, PipelineConfig};
//!
//! # fn frames() -> Vec<(Vec<u8>, u32, u32, Duration)> { Vec::new() }
//! let mut session = CaptureSession::new(PipelineConfig::from_env(), Duration::ZERO)?;
//! for (rgba, width, height, timestamp) in frames() {
//!     let report = session.process_frame(&rgba, width, height, timestamp)?;
//!     if let Some(images) = report.captured {
//!         println!("captured {} crop(s)", images.len());
//!         break;
//!     }
//! }
//! # Ok::<(), facecap_vision::VisionError>(())
//! ```

pub mod capture;
pub mod config;
pub mod detection;
pub mod error;
pub mod eyes;
pub mod grayscale;
pub mod metrics;
pub mod pupil;
pub mod session;
pub mod statistics;

pub use capture::{CaptureDecision, CaptureStabilityController, FrameCropper};
pub use config::{CaptureConfig, DetectorConfig, LocalizerConfig, PipelineConfig, ScanParams};
pub use detection::{cluster_detections, DetectionMemory, FaceClassifier, FaceDetector};
pub use error::{VisionError, VisionResult};
pub use eyes::EyeRegionDeriver;
pub use grayscale::GrayscaleConverter;
pub use pupil::{LandmarkLocalizer, PupilLocalizer, PupilMiss};
pub use session::CaptureSession;
pub use statistics::{DetectionStatisticsTracker, ThresholdKey};
