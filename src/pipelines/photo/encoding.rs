// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding
//!
//! Developed images are stored as JPEG. Alpha is dropped before encoding
//! since JPEG has no alpha channel.

use crate::constants::film;
use crate::errors::PhotoError;
use image::{RgbImage, RgbaImage};
use tracing::debug;

/// Encoded image data
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// JPEG photo encoder
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Create an encoder with the given JPEG quality (1-100)
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// JPEG quality in use
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a developed image
    pub fn encode(&self, image: &RgbaImage) -> Result<EncodedImage, PhotoError> {
        let rgb = Self::convert_rgba_to_rgb(image);
        let data = self.encode_jpeg(&rgb)?;

        debug!(
            size = data.len(),
            quality = self.quality,
            "Encoding complete"
        );

        Ok(EncodedImage {
            data,
            mime_type: film::MIME_TYPE,
            width: image.width(),
            height: image.height(),
        })
    }

    /// Convert RGBA image to RGB image (drop alpha channel)
    fn convert_rgba_to_rgb(image: &RgbaImage) -> RgbImage {
        let rgb_data: Vec<u8> = image
            .as_raw()
            .chunks_exact(4)
            .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
            .collect();

        RgbImage::from_raw(image.width(), image.height(), rgb_data)
            .unwrap_or_else(|| RgbImage::new(image.width(), image.height()))
    }

    fn encode_jpeg(&self, image: &RgbImage) -> Result<Vec<u8>, PhotoError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, self.quality);

        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new(film::JPEG_QUALITY)
    }
}
