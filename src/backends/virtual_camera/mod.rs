// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera sources
//!
//! Sources that behave like a camera without touching hardware. Useful for
//! headless runs and for exercising the lifecycle and capture paths.
//!
//! ```text
//! image file ──▶ decode (blocking pool) ──▶ ticker (~30fps) ──▶ FrameWatch
//! ```

mod still_source;

pub use still_source::{StillImageSource, StillImageStream, load_image_as_frame};
