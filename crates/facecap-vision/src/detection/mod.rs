//! Face detection for the capture pipeline.
//!
//! A pass runs the attached [`FaceClassifier`] over the luminance frame,
//! feeds the raw candidates through [`DetectionMemory`], merges overlapping
//! windows with [`cluster_detections`] and drops anything at or below the
//! confidence floor.

pub mod classifier;
pub mod cluster;
pub mod detector;
pub mod memory;

pub use classifier::FaceClassifier;
pub use cluster::cluster_detections;
pub use detector::FaceDetector;
pub use memory::DetectionMemory;
