// SPDX-License-Identifier: MPL-2.0

//! Synthetic film grain
//!
//! One uniform sample per pixel is added to R, G and B alike, which gives
//! monochrome grain instead of colour noise. Grain runs after the filter so
//! its strength does not depend on the selected look.

use image::RgbaImage;
use rand::Rng;

/// Add grain of at most `amplitude` (8-bit units) to every pixel
///
/// Channels saturate at 0 and 255; alpha is never touched.
pub fn apply_grain<R: Rng>(image: &mut RgbaImage, amplitude: f32, rng: &mut R) {
    if amplitude <= 0.0 {
        return;
    }

    for pixel in image.pixels_mut() {
        // Channels are integral, so rounding the sample once keeps the
        // delta identical across R, G and B
        let noise = rng.gen_range(-amplitude..=amplitude).round() as i16;
        for channel in pixel.0.iter_mut().take(3) {
            *channel = (*channel as i16 + noise).clamp(0, 255) as u8;
        }
    }
}
