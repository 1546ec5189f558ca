// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants
//!
//! Everything here is fixed at compile time. The roll size, the filter set and
//! the requested resolution are deliberately not part of the user config.

use std::time::Duration;

/// Film roll constants
pub mod film {
    /// Number of exposures on a fresh roll
    pub const ROLL_SIZE: u32 = 24;

    /// Maximum grain perturbation per pixel, in 8-bit channel units
    pub const GRAIN_AMPLITUDE: f32 = 10.0;

    /// JPEG quality used for captured stills (0-100)
    pub const JPEG_QUALITY: u8 = 90;

    /// MIME type of captured stills
    pub const MIME_TYPE: &str = "image/jpeg";
}

/// Stream request constraints
pub mod stream {
    /// Ideal capture width requested from the video source
    pub const TARGET_WIDTH: u32 = 1280;

    /// Ideal capture height requested from the video source
    pub const TARGET_HEIGHT: u32 = 720;

    /// Frame channel depth between a source and its consumers
    pub const MAX_BUFFERS: u32 = 2;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Hard deadline for a freshly acquired stream to deliver its first frame
    pub const READY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Length of the white flash shown after a capture
    pub const FLASH_DURATION: Duration = Duration::from_millis(150);

    /// Length of the "capturing" indicator shown after a capture
    pub const CAPTURING_DURATION: Duration = Duration::from_millis(300);

    /// Frame interval for still-image sources (~30fps)
    pub const STILL_FRAME_INTERVAL: Duration = Duration::from_millis(33);

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;
}

/// Supported file formats for still-image sources
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capturing_outlasts_flash() {
        assert!(timing::CAPTURING_DURATION > timing::FLASH_DURATION);
    }

    #[test]
    fn test_image_extensions() {
        assert!(file_formats::is_image_extension("JPG"));
        assert!(file_formats::is_image_extension("png"));
        assert!(!file_formats::is_image_extension("mp4"));
    }
}
