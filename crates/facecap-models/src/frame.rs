//! Single-channel luminance frame.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Row-major 8-bit luminance buffer.
///
/// `stride` is the distance in bytes between the starts of two consecutive
/// rows. Frames produced by the grayscale converter are tightly packed, so
/// `stride == width`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GrayFrame {
    /// Luminance values, `stride * height` bytes
    pub pixels: Vec<u8>,
    /// Frame width in pixels (number of columns)
    pub width: u32,
    /// Frame height in pixels (number of rows)
    pub height: u32,
    /// Bytes per row
    pub stride: u32,
}

impl GrayFrame {
    /// Create a tightly packed frame of the given size filled with zeros.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize],
            width,
            height,
            stride: width,
        }
    }

    /// Number of pixels in the frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the frame has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Luminance at `(row, col)`, or `None` outside the frame.
    pub fn get(&self, row: u32, col: u32) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.pixels
            .get(row as usize * self.stride as usize + col as usize)
            .copied()
    }

    /// Whether a (fractional) row/col position lies inside the frame.
    ///
    /// Both coordinates must satisfy `0 <= v < extent`.
    pub fn contains(&self, row: f64, col: f64) -> bool {
        row >= 0.0 && col >= 0.0 && row < self.height as f64 && col < self.width as f64
    }
}
