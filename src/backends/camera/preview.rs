// SPDX-License-Identifier: GPL-3.0-only

//! Headless preview surface
//!
//! Holds the frame channel of the bound stream and renders the latest frame
//! with the current film look on demand. Clones share state, so a UI can keep
//! one copy while the lifecycle controller owns another.

use super::PreviewSurface;
use super::types::*;
use crate::pipelines::photo::{FilterMode, render_frame};
use image::RgbaImage;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

#[derive(Default)]
struct PreviewState {
    frames: Option<FrameWatch>,
    playing: bool,
    mirror: bool,
}

/// Preview surface backed by the latest-frame channel
#[derive(Clone, Default)]
pub struct FramePreview {
    state: Arc<Mutex<PreviewState>>,
}

impl FramePreview {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, PreviewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a stream is bound and playing
    pub fn is_playing(&self) -> bool {
        let state = self.state();
        state.playing && state.frames.is_some()
    }

    /// Mirror the preview horizontally (front cameras)
    pub fn set_mirror(&self, mirror: bool) {
        self.state().mirror = mirror;
    }

    pub fn is_mirrored(&self) -> bool {
        self.state().mirror
    }

    /// Latest frame of the bound stream
    pub fn latest_frame(&self) -> Option<Arc<CameraFrame>> {
        let state = self.state();
        if !state.playing {
            return None;
        }
        let frame = state.frames.as_ref()?.borrow().clone();
        frame
    }

    /// Render the latest frame with `filter` applied
    ///
    /// Grain is only added to captured stills, never to the preview.
    pub fn draw(&self, filter: FilterMode) -> Option<RgbaImage> {
        let frame = self.latest_frame()?;
        let mut image = match render_frame(&frame) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "Dropping preview frame");
                return None;
            }
        };

        filter.descriptor().apply(&mut image);
        if self.is_mirrored() {
            image::imageops::flip_horizontal_in_place(&mut image);
        }
        Some(image)
    }
}

impl PreviewSurface for FramePreview {
    fn bind(&mut self, frames: FrameWatch) {
        let mut state = self.state();
        state.frames = Some(frames);
        state.playing = false;
        debug!("Preview bound to stream");
    }

    fn play(&mut self) -> BackendResult<()> {
        let mut state = self.state();
        if state.frames.is_none() {
            return Err(BackendError::Other(
                "Preview has no stream to play".to_string(),
            ));
        }
        state.playing = true;
        debug!("Preview playing");
        Ok(())
    }

    fn detach(&mut self) {
        let mut state = self.state();
        state.frames = None;
        state.playing = false;
        debug!("Preview detached");
    }
}

impl std::fmt::Debug for FramePreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("FramePreview")
            .field("bound", &state.frames.is_some())
            .field("playing", &state.playing)
            .field("mirror", &state.mirror)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_preview() -> (FramePreview, FramePublisher) {
        let (publisher, frames) = tokio::sync::watch::channel(None);
        let mut preview = FramePreview::new();
        preview.bind(frames);
        (preview, publisher)
    }

    #[test]
    fn test_play_requires_binding() {
        let mut preview = FramePreview::new();
        assert!(preview.play().is_err());
    }

    #[test]
    fn test_draw_follows_latest_frame() {
        let (mut preview, publisher) = bound_preview();
        preview.play().unwrap();
        assert!(preview.draw(FilterMode::Natural).is_none());

        publisher.send_replace(Some(Arc::new(CameraFrame::from_rgba(
            3,
            2,
            vec![100u8; 24],
        ))));
        let image = preview.draw(FilterMode::Sepia).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
    }

    #[test]
    fn test_mirror_flips_columns() {
        let (mut preview, publisher) = bound_preview();
        preview.play().unwrap();
        preview.set_mirror(true);
        publisher.send_replace(Some(Arc::new(CameraFrame::from_rgba(
            2,
            1,
            vec![0u8, 0, 0, 255, 255, 255, 255, 255],
        ))));

        let image = preview.draw(FilterMode::Natural).unwrap();
        assert!(image.get_pixel(0, 0)[0] > image.get_pixel(1, 0)[0]);
    }

    #[test]
    fn test_detach_clears_shared_state() {
        let (mut preview, publisher) = bound_preview();
        let observer = preview.clone();
        preview.play().unwrap();
        publisher.send_replace(Some(Arc::new(CameraFrame::from_rgba(1, 1, vec![0u8; 4]))));
        assert!(observer.is_playing());

        preview.detach();
        assert!(!observer.is_playing());
        assert!(observer.latest_frame().is_none());
    }
}
