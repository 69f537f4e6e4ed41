//! Per-frame pipeline output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::capture::{CapturePhase, CapturedImage};
use crate::face::{EyePupils, FaceDetection};
use crate::stats::DetectionStats;

/// Everything one detection pass produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameReport {
    /// Frame timestamp as delivered by the frame source
    pub timestamp: Duration,
    /// Faces that survived smoothing, clustering and the confidence floor
    pub faces: Vec<FaceDetection>,
    /// Pupil results, one entry per face in `faces` order
    pub pupils: Vec<EyePupils>,
    /// Statistics after this frame was recorded
    pub stats: DetectionStats,
    /// Capture phase after this frame was observed
    pub phase: CapturePhase,
    /// Crops taken on this frame; `Some` only on the capturing frame
    pub captured: Option<Vec<CapturedImage>>,
    /// Wall-clock time spent in the pass
    pub processing_time: Duration,
}

impl FrameReport {
    /// Whether this frame triggered the session's capture.
    pub fn did_capture(&self) -> bool {
        self.captured.is_some()
    }
}
