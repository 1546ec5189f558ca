// SPDX-License-Identifier: MPL-2.0

//! Post-processing for captured frames
//!
//! Turns a raw camera frame into a developed RGBA image:
//! - Unpack the frame (stride, pixel format) at its native size
//! - Apply the selected film look
//! - Add film grain

use super::filters::FilterMode;
use super::grain::apply_grain;
use crate::backends::camera::types::{CameraFrame, PixelFormat};
use crate::constants::film;
use crate::errors::PhotoError;
use image::RgbaImage;
use rand::Rng;
use tracing::debug;

/// Unpack a camera frame into a tightly packed RGBA image
///
/// Output dimensions always equal the frame's native dimensions.
pub fn render_frame(frame: &CameraFrame) -> Result<RgbaImage, PhotoError> {
    if !frame.is_complete() {
        return Err(PhotoError::InvalidFrame(format!(
            "{}x{} {:?} frame with stride {} has only {} bytes",
            frame.width,
            frame.height,
            frame.format,
            frame.stride,
            frame.data.len()
        )));
    }

    let width = frame.width as usize;
    let stride = frame.stride as usize;
    let bpp = frame.format.bytes_per_pixel();
    let mut rgba = Vec::with_capacity(width * frame.height as usize * 4);

    for row in frame.data.chunks(stride).take(frame.height as usize) {
        let row = &row[..width * bpp];
        match frame.format {
            PixelFormat::RGBA => rgba.extend_from_slice(row),
            PixelFormat::BGRA => {
                for px in row.chunks_exact(4) {
                    rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
            PixelFormat::RGB24 => {
                for px in row.chunks_exact(3) {
                    rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
            }
            PixelFormat::Gray8 => {
                for &luma in row {
                    rgba.extend_from_slice(&[luma, luma, luma, 255]);
                }
            }
        }
    }

    RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| PhotoError::InvalidFrame("Failed to create RGBA image".to_string()))
}

/// Post-processor for captured frames
#[derive(Debug, Clone)]
pub struct PostProcessor {
    grain_amplitude: f32,
}

impl PostProcessor {
    /// Create a post-processor with the given grain strength
    pub fn new(grain_amplitude: f32) -> Self {
        Self { grain_amplitude }
    }

    /// Develop a frame: unpack, apply the look, then add grain
    pub fn process<R: Rng>(
        &self,
        frame: &CameraFrame,
        filter: FilterMode,
        rng: &mut R,
    ) -> Result<RgbaImage, PhotoError> {
        let mut image = render_frame(frame)?;
        filter.descriptor().apply(&mut image);
        apply_grain(&mut image, self.grain_amplitude, rng);

        debug!(
            width = image.width(),
            height = image.height(),
            filter = %filter,
            "Frame developed"
        );

        Ok(image)
    }
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new(film::GRAIN_AMPLITUDE)
    }
}
