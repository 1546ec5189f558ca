// SPDX-License-Identifier: GPL-3.0-only

//! Still image video source
//!
//! Decodes an image file once and republishes it as a live stream on a fixed
//! ticker, so it behaves like a camera that always sees the same scene.

use crate::backends::camera::types::*;
use crate::backends::camera::{MediaStream, VideoSource};
use crate::constants::{file_formats, timing};
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Load an image file and convert it to a CameraFrame
///
/// Supports common image formats: PNG, JPEG, GIF, BMP, WebP
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    info!(path = %path.display(), "Loading image file");

    let img = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) => BackendError::from(io),
        other => BackendError::NotReadable(format!(
            "Failed to decode image '{}': {}",
            path.display(),
            other
        )),
    })?;

    let rgba = img.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();

    info!(width, height, "Image loaded successfully");

    Ok(CameraFrame::from_rgba(width, height, rgba.into_raw()))
}

/// Video source that serves one image file
#[derive(Debug, Clone)]
pub struct StillImageSource {
    path: PathBuf,
    label: String,
}

impl StillImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(file_formats::is_image_extension)
        {
            debug!(path = %path.display(), "Unrecognized image extension, will try to decode anyway");
        }

        Self { path, label }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VideoSource for StillImageSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn request(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, BackendResult<Box<dyn MediaStream>>> {
        let path = self.path.clone();
        let label = self.label.clone();

        Box::pin(async move {
            debug!(%constraints, "Still image source ignores size and facing preferences");

            let frame = tokio::task::spawn_blocking(move || load_image_as_frame(&path))
                .await
                .map_err(|e| BackendError::Other(format!("Image loader task failed: {}", e)))??;

            Ok(Box::new(StillImageStream::start(label, frame)) as Box<dyn MediaStream>)
        })
    }
}

/// Live stream republishing a decoded still
pub struct StillImageStream {
    label: String,
    frames: FrameWatch,
    ticker: Option<JoinHandle<()>>,
}

impl StillImageStream {
    fn start(label: String, frame: CameraFrame) -> Self {
        let (publisher, frames) = tokio::sync::watch::channel(None);
        let ticker = tokio::spawn(publish_frames(publisher, frame));

        info!(device = %label, "Still image stream started");

        Self {
            label,
            frames,
            ticker: Some(ticker),
        }
    }
}

async fn publish_frames(publisher: FramePublisher, frame: CameraFrame) {
    let mut interval = tokio::time::interval(timing::STILL_FRAME_INTERVAL);
    let mut frame_count: u64 = 0;

    loop {
        interval.tick().await;

        let next = CameraFrame {
            captured_at: Instant::now(),
            ..frame.clone()
        };
        publisher.send_replace(Some(Arc::new(next)));

        frame_count += 1;
        if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(frame = frame_count, "Still image frame published");
        }
    }
}

impl MediaStream for StillImageStream {
    fn label(&self) -> &str {
        &self.label
    }

    fn frames(&self) -> FrameWatch {
        self.frames.clone()
    }

    fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            info!(device = %self.label, "Still image stream stopped");
        }
    }

    fn is_live(&self) -> bool {
        self.ticker.is_some()
    }
}

impl Drop for StillImageStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[tokio::test]
    async fn test_missing_file_is_device_not_found() {
        let source = StillImageSource::new("/nonexistent/film-camera/scene.png");
        let result = source.request(StreamConstraints::default()).await;
        assert!(matches!(result, Err(BackendError::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn test_garbage_file_is_not_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = StillImageSource::new(&path)
            .request(StreamConstraints::default())
            .await;
        assert!(matches!(result, Err(BackendError::NotReadable(_))));
    }

    #[tokio::test]
    async fn test_stream_publishes_native_size_until_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.png");
        RgbaImage::from_pixel(5, 3, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let source = StillImageSource::new(&path);
        assert_eq!(source.name(), "scene.png");

        let mut stream = source.request(StreamConstraints::default()).await.unwrap();
        let mut frames = stream.frames();
        let frame = frames
            .wait_for(|f| f.is_some())
            .await
            .unwrap()
            .clone()
            .unwrap();
        assert_eq!((frame.width, frame.height), (5, 3));
        assert!(stream.is_live());

        stream.stop();
        stream.stop();
        assert!(!stream.is_live());
    }
}
