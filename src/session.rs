// SPDX-License-Identifier: GPL-3.0-only

//! Capture session
//!
//! Ties one camera, one roll of film, the selected look and an exporter
//! together. Captures only run while the camera is active and always use the
//! frame of the stream held right now.

use crate::backends::camera::{
    CameraLifecycleController, CameraStatus, PreviewSurface, VideoSource,
};
use crate::pipelines::photo::{
    CaptureCompositor, CaptureSkipped, CapturedArtifact, FilmBudget, FilterMode,
};
use crate::storage::Exporter;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

pub struct CaptureSession {
    camera: CameraLifecycleController,
    compositor: CaptureCompositor,
    filter: FilterMode,
    exporter: Exporter,
}

impl CaptureSession {
    pub fn new(
        source: Box<dyn VideoSource>,
        surface: Box<dyn PreviewSurface>,
        exporter: Exporter,
    ) -> Self {
        Self::with_parts(
            CameraLifecycleController::new(source, surface),
            CaptureCompositor::new(),
            exporter,
        )
    }

    /// Build from preconfigured parts
    pub fn with_parts(
        camera: CameraLifecycleController,
        compositor: CaptureCompositor,
        exporter: Exporter,
    ) -> Self {
        Self {
            camera,
            compositor,
            filter: FilterMode::default(),
            exporter,
        }
    }

    pub fn camera(&self) -> &CameraLifecycleController {
        &self.camera
    }

    pub fn status(&self) -> &CameraStatus {
        self.camera.status()
    }

    pub async fn start(&mut self) -> CameraStatus {
        self.camera.start().await
    }

    pub async fn retry(&mut self) -> CameraStatus {
        self.camera.retry().await
    }

    pub async fn switch_camera(&mut self) -> CameraStatus {
        self.camera.switch_camera().await
    }

    pub fn stop(&mut self) {
        self.camera.stop();
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        debug!(%filter, "Filter selected");
        self.filter = filter;
    }

    pub fn budget(&self) -> FilmBudget {
        self.compositor.budget()
    }

    pub fn last_capture(&self) -> Option<&CapturedArtifact> {
        self.compositor.last_capture()
    }

    pub fn is_flashing(&self) -> bool {
        self.compositor.is_flashing(Instant::now())
    }

    pub fn is_capturing(&self) -> bool {
        self.compositor.is_capturing(Instant::now())
    }

    /// Take a photo; silently does nothing when it can't
    pub fn capture(&mut self) -> Option<CapturedArtifact> {
        match self.try_capture() {
            Ok(artifact) => Some(artifact),
            Err(reason) => {
                debug!(%reason, "Capture skipped");
                None
            }
        }
    }

    /// Take a photo, reporting why nothing was taken
    pub fn try_capture(&mut self) -> Result<CapturedArtifact, CaptureSkipped> {
        if !self.camera.status().is_active() {
            return Err(CaptureSkipped::CameraInactive);
        }
        let frame = self.camera.current_frame();
        self.compositor.try_capture(frame.as_deref(), self.filter)
    }

    /// Export the last capture, if there is one
    pub fn export_last(&self) -> Option<PathBuf> {
        let artifact = self.compositor.last_capture()?;
        let path = self.exporter.export(artifact);
        if let Some(path) = &path {
            info!(path = %path.display(), "Last capture exported");
        }
        path
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("camera", &self.camera)
            .field("compositor", &self.compositor)
            .field("filter", &self.filter)
            .finish()
    }
}
