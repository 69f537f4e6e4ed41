//! Face, eye and pupil data.
//!
//! Coordinates follow the classifier convention: `row` is the vertical
//! position (y), `col` the horizontal position (x), both in pixels of the
//! analysed frame. Detections and eye regions are square windows described
//! by their center and side length.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate face reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceDetection {
    /// Center row
    pub row: f64,
    /// Center column
    pub col: f64,
    /// Window diameter (side length)
    pub size: f64,
    /// Classifier confidence on its native scale
    pub confidence: f64,
}

impl FaceDetection {
    /// Create a new detection.
    pub fn new(row: f64, col: f64, size: f64, confidence: f64) -> Self {
        Self {
            row,
            col,
            size,
            confidence,
        }
    }

    /// Half the window side.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Intersection over Union of the two square windows.
    ///
    /// Uses the overlap of the axis-aligned squares around each center,
    /// which is how the cascade classifier compares its detections.
    pub fn iou(&self, other: &FaceDetection) -> f64 {
        let overlap_r = (self.row + self.radius()).min(other.row + other.radius())
            - (self.row - self.radius()).max(other.row - other.radius());
        let overlap_c = (self.col + self.radius()).min(other.col + other.radius())
            - (self.col - self.radius()).max(other.col - other.radius());

        if overlap_r <= 0.0 || overlap_c <= 0.0 {
            return 0.0;
        }

        let intersection = overlap_r * overlap_c;
        let union = self.size * self.size + other.size * other.size - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

/// Which eye an [`EyeRegion`] belongs to.
///
/// Left and right are in image column order (left = smaller column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    /// Both sides in localization order.
    pub const ALL: [EyeSide; 2] = [EyeSide::Left, EyeSide::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            EyeSide::Left => "left",
            EyeSide::Right => "right",
        }
    }
}

impl fmt::Display for EyeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Square search window for the pupil localizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EyeRegion {
    /// Which eye this region was derived for
    pub side: EyeSide,
    /// Center row
    pub row: f64,
    /// Center column
    pub col: f64,
    /// Window side length
    pub size: f64,
}

impl EyeRegion {
    /// Create a new eye region.
    pub fn new(side: EyeSide, row: f64, col: f64, size: f64) -> Self {
        Self {
            side,
            row,
            col,
            size,
        }
    }

    /// Whether the region may be handed to the localizer for a frame of the
    /// given size: center inside `[0, height) x [0, width)` and a positive size.
    pub fn is_valid_for(&self, width: u32, height: u32) -> bool {
        self.row >= 0.0
            && self.col >= 0.0
            && self.row < height as f64
            && self.col < width as f64
            && self.size > 0.0
    }
}

/// Localized pupil center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PupilPosition {
    pub row: f64,
    pub col: f64,
}

impl PupilPosition {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }
}

/// Pupil results for one face. `None` means the eye was skipped or not found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EyePupils {
    pub left: Option<PupilPosition>,
    pub right: Option<PupilPosition>,
}

impl EyePupils {
    /// Result slot for one side.
    pub fn get(&self, side: EyeSide) -> Option<PupilPosition> {
        match side {
            EyeSide::Left => self.left,
            EyeSide::Right => self.right,
        }
    }

    /// Store the result for one side.
    pub fn set(&mut self, side: EyeSide, pupil: Option<PupilPosition>) {
        match side {
            EyeSide::Left => self.left = pupil,
            EyeSide::Right => self.right = pupil,
        }
    }

    /// Number of pupils found (0-2).
    pub fn found(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }
}
