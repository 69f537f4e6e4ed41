//! Error types for vision operations.

use thiserror::Error;

/// Result type for vision operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur inside the capture pipeline.
///
/// Only [`VisionError::InvalidFrame`] ever reaches the caller of
/// `CaptureSession::process_frame`; collaborator failures are logged and
/// degraded to empty results.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Invalid frame: expected {expected} RGBA bytes for {width}x{height}, got {actual}")]
    InvalidFrame {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Face classifier failed: {0}")]
    ClassifierFailed(String),

    #[error("Landmark localizer failed: {0}")]
    LocalizerFailed(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),
}

impl VisionError {
    /// Create an invalid frame error for an RGBA buffer of the wrong size.
    ///
    /// `expected` saturates at `usize::MAX` for dimensions no buffer can hold.
    pub fn invalid_frame(width: u32, height: u32, actual: usize) -> Self {
        Self::InvalidFrame {
            width,
            height,
            expected: (width as usize)
                .saturating_mul(height as usize)
                .saturating_mul(4),
            actual,
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create a classifier failure error.
    pub fn classifier_failed(message: impl Into<String>) -> Self {
        Self::ClassifierFailed(message.into())
    }

    /// Create a localizer failure error.
    pub fn localizer_failed(message: impl Into<String>) -> Self {
        Self::LocalizerFailed(message.into())
    }

    /// Create an encoding failure error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }
}
