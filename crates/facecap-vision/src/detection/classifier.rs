//! Face classifier interface.
//!
//! The cascade model itself lives outside this crate; the pipeline only
//! needs something that scans a luminance frame and reports raw candidates.

use facecap_models::{FaceDetection, GrayFrame};

use crate::config::ScanParams;
use crate::error::VisionResult;

/// Scans a frame for face candidates.
///
/// Implementations return every raw window that scored, in their own output
/// order. Smoothing, clustering and confidence filtering happen downstream in
/// [`super::FaceDetector`].
pub trait FaceClassifier: Send + Sync {
    /// Run the classifier over `frame` with the given scan parameters.
    fn classify(&self, frame: &GrayFrame, params: &ScanParams) -> VisionResult<Vec<FaceDetection>>;

    /// Classifier name for logging.
    fn name(&self) -> &'static str;
}

impl<C: FaceClassifier + ?Sized> FaceClassifier for Box<C> {
    fn classify(&self, frame: &GrayFrame, params: &ScanParams) -> VisionResult<Vec<FaceDetection>> {
        (**self).classify(frame, params)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
