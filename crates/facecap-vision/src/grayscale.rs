//! RGBA to luminance conversion with a reusable scratch buffer.
//!
//! The classifier expects green-weighted luminance:
//! `gray = round((2*R + 7*G + 1*B) / 10)`. Alpha is ignored.
//!
//! # Usage
//! ```rust
//! use facecap_vision::grayscale::GrayscaleConverter;
//!
//! let mut converter = GrayscaleConverter::new();
//! let rgba = vec![255u8; 4 * 4 * 4];
//! let gray = converter.convert(&rgba, 4, 4).unwrap();
//! assert_eq!(gray.len(), 16);
//! ```

use facecap_models::GrayFrame;
use tracing::debug;

use crate::error::{VisionError, VisionResult};

/// Weighted luminance of one pixel, rounded half up.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    // Max is (2+7+1)*255 + 5 = 2555, so the quotient always fits in a u8
    ((2 * r as u32 + 7 * g as u32 + b as u32 + 5) / 10) as u8
}

/// Byte length of a packed `width x height` RGBA buffer, `None` if it
/// does not fit in `usize`.
pub fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
}

/// Converts RGBA frames into an owned [`GrayFrame`].
///
/// The output buffer is reused across frames and only reallocated when the
/// frame dimensions change.
#[derive(Debug, Default)]
pub struct GrayscaleConverter {
    scratch: GrayFrame,
    /// Frames converted (for stats)
    frames_converted: u64,
    /// Buffer (re)allocations triggered
    allocations: u64,
}

impl GrayscaleConverter {
    /// Create a converter with an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert an RGBA buffer of `width x height` pixels.
    ///
    /// The returned frame borrows the converter's scratch buffer and is
    /// overwritten by the next call.
    pub fn convert(&mut self, rgba: &[u8], width: u32, height: u32) -> VisionResult<&GrayFrame> {
        let expected = rgba_len(width, height);
        if width == 0 || height == 0 || expected != Some(rgba.len()) {
            return Err(VisionError::invalid_frame(width, height, rgba.len()));
        }

        if self.scratch.width != width || self.scratch.height != height {
            debug!(
                width,
                height,
                previous_width = self.scratch.width,
                previous_height = self.scratch.height,
                "Resizing grayscale scratch buffer"
            );
            self.scratch = GrayFrame::new(width, height);
            self.allocations += 1;
        }

        for (dst, px) in self.scratch.pixels.iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = luminance(px[0], px[1], px[2]);
        }

        self.frames_converted += 1;
        Ok(&self.scratch)
    }

    /// Drop the scratch buffer.
    pub fn release(&mut self) {
        self.scratch = GrayFrame::default();
    }

    /// Frames converted since creation.
    pub fn frames_converted(&self) -> u64 {
        self.frames_converted
    }

    /// Scratch buffer allocations since creation.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }
}
