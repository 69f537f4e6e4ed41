//! Square face crop of the captured frame, encoded as PNG.

use facecap_models::{CapturedImage, FaceDetection};
use image::codecs::png::PngEncoder;
use image::{imageops, ColorType, ImageEncoder, RgbaImage};
use tracing::debug;

use crate::error::{VisionError, VisionResult};
use crate::grayscale::rgba_len;

/// Pixel rectangle inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Square window around `face`, clamped to a `frame_width x frame_height`
/// frame.
///
/// The window starts at `max(0, center - size/2)` on each axis and is cut
/// at the right and bottom edges. Returns `None` when nothing is left.
pub fn crop_rect(face: &FaceDetection, frame_width: u32, frame_height: u32) -> Option<CropRect> {
    if !(face.row.is_finite() && face.col.is_finite() && face.size.is_finite()) || face.size <= 0.0 {
        return None;
    }

    let side = face.size.round();
    let x = (face.col - face.size / 2.0).max(0.0).round();
    let y = (face.row - face.size / 2.0).max(0.0).round();

    let width = side.min(frame_width as f64 - x);
    let height = side.min(frame_height as f64 - y);
    if width < 1.0 || height < 1.0 {
        return None;
    }

    Some(CropRect {
        x: x as u32,
        y: y as u32,
        width: width as u32,
        height: height as u32,
    })
}

/// Crops the first detected face out of an RGBA frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCropper;

impl FrameCropper {
    pub fn new() -> Self {
        Self
    }

    /// Crop and encode the first face in `faces`.
    ///
    /// Returns an empty list when there is no face or the window falls
    /// entirely outside the frame. Only one crop is ever produced.
    pub fn capture(
        &self,
        rgba: &[u8],
        width: u32,
        height: u32,
        faces: &[FaceDetection],
    ) -> VisionResult<Vec<CapturedImage>> {
        if rgba_len(width, height) != Some(rgba.len()) {
            return Err(VisionError::invalid_frame(width, height, rgba.len()));
        }

        let Some(face) = faces.first() else {
            debug!("No face to crop");
            return Ok(Vec::new());
        };

        let Some(rect) = crop_rect(face, width, height) else {
            debug!(
                row = face.row,
                col = face.col,
                size = face.size,
                "Face window outside frame, nothing to crop"
            );
            return Ok(Vec::new());
        };

        let frame = RgbaImage::from_raw(width, height, rgba.to_vec())
            .ok_or_else(|| VisionError::invalid_frame(width, height, rgba.len()))?;
        let crop = imageops::crop_imm(&frame, rect.x, rect.y, rect.width, rect.height).to_image();

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(crop.as_raw(), rect.width, rect.height, ColorType::Rgba8)
            .map_err(|e| VisionError::encode(format!("PNG: {}", e)))?;

        debug!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            bytes = png.len(),
            "Face crop encoded"
        );

        Ok(vec![CapturedImage {
            png,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }])
    }
}
