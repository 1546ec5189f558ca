// SPDX-License-Identifier: MPL-2.0

//! Film looks
//!
//! Each [`FilterMode`] maps to a fixed, ordered list of colour adjustments.
//! The adjustments follow the CSS filter-effects definitions so the preview
//! and the developed still agree, and every step clamps to `0.0..=1.0`.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Film look selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Light contrast and saturation lift
    #[default]
    Natural,
    /// Faded warm negative film
    VintageFilm,
    /// Brown monochrome print
    Sepia,
    /// Punchy, slightly cool instant print
    InstantPrint,
}

impl FilterMode {
    /// Get all filter variants for UI iteration
    pub const ALL: [FilterMode; 4] = [
        FilterMode::Natural,
        FilterMode::VintageFilm,
        FilterMode::Sepia,
        FilterMode::InstantPrint,
    ];

    /// Get display name for the filter
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterMode::Natural => "Natural",
            FilterMode::VintageFilm => "Vintage Film",
            FilterMode::Sepia => "Sepia",
            FilterMode::InstantPrint => "Instant Print",
        }
    }

    /// Identifier used on the command line and in the config file
    pub fn id(&self) -> &'static str {
        match self {
            FilterMode::Natural => "natural",
            FilterMode::VintageFilm => "vintage-film",
            FilterMode::Sepia => "sepia",
            FilterMode::InstantPrint => "instant-print",
        }
    }

    /// Transform applied for this look
    pub fn descriptor(&self) -> FilterDescriptor {
        let adjustments = match self {
            FilterMode::Natural => NATURAL,
            FilterMode::VintageFilm => VINTAGE_FILM,
            FilterMode::Sepia => SEPIA,
            FilterMode::InstantPrint => INSTANT_PRINT,
        };

        FilterDescriptor { adjustments }
    }
}

const NATURAL: &[Adjustment] = &[Adjustment::Contrast(1.05), Adjustment::Saturate(1.1)];

const VINTAGE_FILM: &[Adjustment] = &[
    Adjustment::Sepia(0.35),
    Adjustment::Contrast(1.1),
    Adjustment::Saturate(0.8),
    Adjustment::Brightness(1.05),
];

const SEPIA: &[Adjustment] = &[
    Adjustment::Sepia(0.85),
    Adjustment::Contrast(1.05),
    Adjustment::Brightness(0.95),
];

const INSTANT_PRINT: &[Adjustment] = &[
    Adjustment::Contrast(0.9),
    Adjustment::Saturate(1.25),
    Adjustment::Brightness(1.1),
    Adjustment::HueRotate(-8.0),
];

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "natural" => Ok(FilterMode::Natural),
            "vintage" | "vintage-film" | "vintagefilm" => Ok(FilterMode::VintageFilm),
            "sepia" => Ok(FilterMode::Sepia),
            "instant" | "instant-print" | "instantprint" => Ok(FilterMode::InstantPrint),
            _ => Err(format!(
                "Unknown filter '{}' (expected one of: {})",
                s,
                FilterMode::ALL
                    .iter()
                    .map(|mode| mode.id())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// A single colour adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// Multiply every channel (1.0 = no change)
    Brightness(f32),
    /// Scale around mid-grey (1.0 = no change)
    Contrast(f32),
    /// Scale chroma (1.0 = no change, 0.0 = grey)
    Saturate(f32),
    /// Blend toward sepia tone (0.0 = none, 1.0 = full)
    Sepia(f32),
    /// Rotate hue by degrees
    HueRotate(f32),
}

impl Adjustment {
    /// Apply to a normalized RGB triple
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match *self {
            Adjustment::Brightness(amount) => rgb.map(|c| c * amount),
            Adjustment::Contrast(amount) => rgb.map(|c| (c - 0.5) * amount + 0.5),
            Adjustment::Saturate(s) => multiply(
                &[
                    [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
                ],
                rgb,
            ),
            Adjustment::Sepia(amount) => {
                let k = 1.0 - amount.clamp(0.0, 1.0);
                multiply(
                    &[
                        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
                        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
                        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
                    ],
                    rgb,
                )
            }
            Adjustment::HueRotate(degrees) => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                multiply(
                    &[
                        [
                            0.213 + cos * 0.787 - sin * 0.213,
                            0.715 - cos * 0.715 - sin * 0.715,
                            0.072 - cos * 0.072 + sin * 0.928,
                        ],
                        [
                            0.213 - cos * 0.213 + sin * 0.143,
                            0.715 + cos * 0.285 + sin * 0.140,
                            0.072 - cos * 0.072 - sin * 0.283,
                        ],
                        [
                            0.213 - cos * 0.213 - sin * 0.787,
                            0.715 - cos * 0.715 + sin * 0.715,
                            0.072 + cos * 0.928 + sin * 0.072,
                        ],
                    ],
                    rgb,
                )
            }
        };

        out.map(|c| c.clamp(0.0, 1.0))
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::Brightness(v) => write!(f, "brightness({})", v),
            Adjustment::Contrast(v) => write!(f, "contrast({})", v),
            Adjustment::Saturate(v) => write!(f, "saturate({})", v),
            Adjustment::Sepia(v) => write!(f, "sepia({})", v),
            Adjustment::HueRotate(v) => write!(f, "hue-rotate({}deg)", v),
        }
    }
}

#[inline]
fn multiply(m: &[[f32; 3]; 3], [r, g, b]: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * r + m[0][1] * g + m[0][2] * b,
        m[1][0] * r + m[1][1] * g + m[1][2] * b,
        m[2][0] * r + m[2][1] * g + m[2][2] * b,
    ]
}

/// Ordered list of adjustments making up a look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDescriptor {
    pub adjustments: &'static [Adjustment],
}

impl FilterDescriptor {
    /// Apply every adjustment in order to one 8-bit RGB pixel
    pub fn apply_rgb(&self, rgb: [u8; 3]) -> [u8; 3] {
        let normalized = rgb.map(|c| c as f32 / 255.0);
        let out = self
            .adjustments
            .iter()
            .fold(normalized, |acc, adjustment| adjustment.apply(acc));
        out.map(|c| (c * 255.0).round() as u8)
    }

    /// Apply to a whole image in place; alpha is left untouched
    pub fn apply(&self, image: &mut RgbaImage) {
        if self.adjustments.is_empty() {
            return;
        }

        for pixel in image.pixels_mut() {
            let [r, g, b] = self.apply_rgb([pixel[0], pixel[1], pixel[2]]);
            pixel[0] = r;
            pixel[1] = g;
            pixel[2] = b;
        }
    }
}

impl fmt::Display for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.adjustments.is_empty() {
            return f.write_str("none");
        }
        let parts: Vec<String> = self.adjustments.iter().map(|a| a.to_string()).collect();
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_neutral_adjustments_keep_pixel() {
        const NEUTRAL: &[Adjustment] = &[
            Adjustment::Brightness(1.0),
            Adjustment::Contrast(1.0),
            Adjustment::Saturate(1.0),
            Adjustment::Sepia(0.0),
            Adjustment::HueRotate(0.0),
        ];
        let descriptor = FilterDescriptor {
            adjustments: NEUTRAL,
        };
        // Matrix coefficients are rounded, allow one step of drift
        for rgb in [[0u8, 0, 0], [255, 255, 255], [200, 40, 90]] {
            let out = descriptor.apply_rgb(rgb);
            for c in 0..3 {
                assert!((out[c] as i16 - rgb[c] as i16).abs() <= 1, "{:?} -> {:?}", rgb, out);
            }
        }
    }

    #[test]
    fn test_sepia_warms_grey() {
        let [r, g, b] = FilterMode::Sepia.descriptor().apply_rgb([128, 128, 128]);
        assert!(r > g && g > b, "expected warm tone, got {} {} {}", r, g, b);
    }

    #[test]
    fn test_saturate_zero_is_grey() {
        let [r, g, b] = Adjustment::Saturate(0.0).apply([1.0, 0.0, 0.0]);
        assert!((r - g).abs() < 1e-6 && (g - b).abs() < 1e-6);
    }

    #[test]
    fn test_contrast_pivots_on_mid_grey() {
        let out = Adjustment::Contrast(2.0).apply([0.5, 0.25, 1.0]);
        assert_eq!(out, [0.5, 0.0, 1.0]);
    }

    #[test]
    fn test_apply_keeps_alpha() {
        let mut image = RgbaImage::from_pixel(3, 2, Rgba([10, 120, 240, 77]));
        FilterMode::InstantPrint.descriptor().apply(&mut image);
        assert!(image.pixels().all(|p| p[3] == 77));
    }

    #[test]
    fn test_descriptors_are_deterministic() {
        for mode in FilterMode::ALL {
            assert_eq!(mode.descriptor(), mode.descriptor());
            assert!(!mode.descriptor().adjustments.is_empty());
        }
    }

    #[test]
    fn test_parse_filter_ids() {
        for mode in FilterMode::ALL {
            assert_eq!(mode.id().parse::<FilterMode>(), Ok(mode));
        }
        assert_eq!("Vintage Film".parse::<FilterMode>(), Ok(FilterMode::VintageFilm));
        assert!("polaroid".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_descriptor_display() {
        assert_eq!(
            FilterMode::Sepia.descriptor().to_string(),
            "sepia(0.85) contrast(1.05) brightness(0.95)"
        );
    }
}
