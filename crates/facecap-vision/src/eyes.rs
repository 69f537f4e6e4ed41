//! Eye search regions derived from a face window.
//!
//! The ratios are fixed properties of the classifier's face window: eyes sit
//! slightly above the window center, symmetrically left and right of it.

use facecap_models::{EyeRegion, EyeSide, FaceDetection};

/// Vertical eye offset as a fraction of face size (upwards).
pub const EYE_ROW_OFFSET: f64 = 0.075;

/// Horizontal eye offset as a fraction of face size.
pub const EYE_COL_OFFSET: f64 = 0.175;

/// Eye search window side as a fraction of face size.
pub const EYE_SIZE_RATIO: f64 = 0.35;

/// Derives the left and right eye regions of a face.
#[derive(Debug, Clone, Copy, Default)]
pub struct EyeRegionDeriver;

impl EyeRegionDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Both eye regions of `face`, left first. Values are exact, not rounded.
    pub fn derive(&self, face: &FaceDetection) -> (EyeRegion, EyeRegion) {
        let row = face.row - EYE_ROW_OFFSET * face.size;
        let size = EYE_SIZE_RATIO * face.size;

        (
            EyeRegion::new(EyeSide::Left, row, face.col - EYE_COL_OFFSET * face.size, size),
            EyeRegion::new(EyeSide::Right, row, face.col + EYE_COL_OFFSET * face.size, size),
        )
    }

    /// Eye region for one side.
    pub fn derive_side(&self, face: &FaceDetection, side: EyeSide) -> EyeRegion {
        let (left, right) = self.derive(face);
        match side {
            EyeSide::Left => left,
            EyeSide::Right => right,
        }
    }
}
