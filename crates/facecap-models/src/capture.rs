//! Capture phases and captured crops.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Phase of the capture stability state machine.
///
/// A session moves `Warming -> Validating -> Captured` and never leaves
/// `Captured` until it is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum CapturePhase {
    /// Idle period after session start; detections are not judged yet.
    #[default]
    Warming,

    /// Accumulating evidence over the evaluation window.
    Validating,

    /// A frame has been cropped. Terminal.
    Captured,
}

impl CapturePhase {
    /// All phases in transition order.
    pub const ALL: &'static [CapturePhase] = &[
        CapturePhase::Warming,
        CapturePhase::Validating,
        CapturePhase::Captured,
    ];

    /// Returns the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CapturePhase::Warming => "warming",
            CapturePhase::Validating => "validating",
            CapturePhase::Captured => "captured",
        }
    }

    /// Returns true once the session has produced its crop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CapturePhase::Captured)
    }
}

impl fmt::Display for CapturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CapturePhase {
    type Err = CapturePhaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warming" => Ok(CapturePhase::Warming),
            "validating" => Ok(CapturePhase::Validating),
            "captured" => Ok(CapturePhase::Captured),
            _ => Err(CapturePhaseParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown capture phase: {0}")]
pub struct CapturePhaseParseError(String);

/// PNG-encoded crop of the captured frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CapturedImage {
    /// PNG file bytes
    pub png: Vec<u8>,
    /// Left edge of the crop in the source frame
    pub x: u32,
    /// Top edge of the crop in the source frame
    pub y: u32,
    /// Crop width in pixels
    pub width: u32,
    /// Crop height in pixels
    pub height: u32,
}

impl CapturedImage {
    /// MIME type of the encoded bytes.
    pub const MIME_TYPE: &'static str = "image/png";

    /// Render the crop as a `data:` URL suitable for an `<img src>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", Self::MIME_TYPE, STANDARD.encode(&self.png))
    }
}
