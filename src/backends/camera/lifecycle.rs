// SPDX-License-Identifier: GPL-3.0-only

//! Camera lifecycle controller
//!
//! Owns the single live [`AcquisitionHandle`], drives the status state machine
//! and guarantees the device is released on every exit path:
//!
//! ```text
//! Idle ──▶ Requesting ──▶ Active
//!              │  ▲          │
//!              ▼  │ retry    │ restart / switch
//!            Error ◀─────────┘ (via Requesting)
//! ```

use super::types::*;
use super::{MediaStream, PreviewSurface, VideoSource};
use crate::constants::timing;
use crate::errors::AcquisitionError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

/// Current state of the camera
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CameraStatus {
    #[default]
    Idle,
    Requesting,
    Active,
    Error(String),
}

impl CameraStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CameraStatus::Active)
    }

    /// Error text, if the last attempt failed
    pub fn error_message(&self) -> Option<&str> {
        match self {
            CameraStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

impl std::fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraStatus::Idle => write!(f, "idle"),
            CameraStatus::Requesting => write!(f, "requesting"),
            CameraStatus::Active => write!(f, "active"),
            CameraStatus::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

/// Exclusive handle to a live stream
///
/// Dropping the handle stops every track, so a handle that escapes through an
/// early return or a cancelled future still releases the device.
pub struct AcquisitionHandle {
    stream: Box<dyn MediaStream>,
    released: bool,
}

impl AcquisitionHandle {
    fn new(stream: Box<dyn MediaStream>) -> Self {
        Self {
            stream,
            released: false,
        }
    }

    /// Label of the underlying device
    pub fn label(&self) -> &str {
        self.stream.label()
    }

    /// Latest-frame channel of the stream
    pub fn frames(&self) -> FrameWatch {
        self.stream.frames()
    }

    /// Most recent frame delivered by the stream
    ///
    /// `None` once the tracks have ended, including when the device went
    /// away on its own.
    pub fn current_frame(&self) -> Option<Arc<CameraFrame>> {
        if !self.stream.is_live() {
            return None;
        }
        self.stream.frames().borrow().clone()
    }

    /// Stop all tracks now
    pub fn release(mut self) {
        self.stop_tracks();
    }

    fn stop_tracks(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.stream.stop();
        info!(device = %self.stream.label(), "Released camera stream");
    }
}

impl Drop for AcquisitionHandle {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

impl std::fmt::Debug for AcquisitionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquisitionHandle")
            .field("label", &self.stream.label())
            .field("released", &self.released)
            .finish()
    }
}

/// Camera lifecycle controller
///
/// `start()` borrows the controller mutably for its whole duration, so two
/// acquisitions can never race on the same controller.
pub struct CameraLifecycleController {
    source: Box<dyn VideoSource>,
    surface: Box<dyn PreviewSurface>,
    constraints: StreamConstraints,
    ready_timeout: Duration,
    handle: Option<AcquisitionHandle>,
    surface_bound: bool,
    status: CameraStatus,
    events: broadcast::Sender<CameraStatus>,
    current: watch::Sender<CameraStatus>,
}

impl CameraLifecycleController {
    /// Create a controller in the `Idle` state
    pub fn new(source: Box<dyn VideoSource>, surface: Box<dyn PreviewSurface>) -> Self {
        info!(source = source.name(), "Creating camera lifecycle controller");

        let (events, _) = broadcast::channel(16);
        let (current, _) = watch::channel(CameraStatus::Idle);

        Self {
            source,
            surface,
            constraints: StreamConstraints::default(),
            ready_timeout: timing::READY_TIMEOUT,
            handle: None,
            surface_bound: false,
            status: CameraStatus::Idle,
            events,
            current,
        }
    }

    /// Override the requested stream constraints
    pub fn with_constraints(mut self, constraints: StreamConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Override the readiness deadline
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Current status
    pub fn status(&self) -> &CameraStatus {
        &self.status
    }

    /// Subscribe to status transitions
    ///
    /// Every transition is delivered in order, including the `Requesting`
    /// step that precedes each acquisition.
    pub fn subscribe(&self) -> broadcast::Receiver<CameraStatus> {
        self.events.subscribe()
    }

    /// Watch the current status
    ///
    /// Unlike [`subscribe`](Self::subscribe), intermediate values may be
    /// skipped; only the latest status is observed.
    pub fn watch_status(&self) -> watch::Receiver<CameraStatus> {
        self.current.subscribe()
    }

    /// Constraints used for every request
    pub fn constraints(&self) -> StreamConstraints {
        self.constraints
    }

    /// Whether a stream is currently held
    pub fn has_stream(&self) -> bool {
        self.handle.is_some()
    }

    /// Latest frame of the held stream
    ///
    /// Always read through the current handle, never cached, so a released
    /// stream can not leak a stale frame into a capture.
    pub fn current_frame(&self) -> Option<Arc<CameraFrame>> {
        if !self.status.is_active() {
            return None;
        }
        self.handle.as_ref()?.current_frame()
    }

    /// Acquire the camera
    ///
    /// Releases any held stream first, then requests a new one and waits for
    /// its first frame. Failures are never returned: they become the
    /// `Error` status, which is also the return value.
    ///
    /// Dropping the returned future mid-acquisition stops the pending stream,
    /// detaches the surface and leaves the controller in `Error`.
    pub async fn start(&mut self) -> CameraStatus {
        self.transition(CameraStatus::Requesting);
        self.release_stream();

        let mut attempt = PendingStart::new(self);
        match attempt.camera.acquire().await {
            Ok(handle) => {
                attempt.camera.handle = Some(handle);
                attempt.camera.transition(CameraStatus::Active);
            }
            Err(err) => {
                warn!(error = %err, "Camera acquisition failed");
                attempt
                    .camera
                    .transition(CameraStatus::Error(err.status_message()));
            }
        }

        attempt.finish()
    }

    /// Retry after an error; identical to a first start
    pub async fn retry(&mut self) -> CameraStatus {
        self.start().await
    }

    /// Restart acquisition ("switch camera")
    ///
    /// There is no device selection; the same request is issued again.
    pub async fn switch_camera(&mut self) -> CameraStatus {
        info!("Switching camera");
        self.start().await
    }

    /// Release the held stream, if any
    ///
    /// Leaves the status untouched. Safe to call any number of times.
    pub fn stop(&mut self) {
        self.release_stream();
    }

    async fn acquire(&mut self) -> Result<AcquisitionHandle, AcquisitionError> {
        info!(
            source = self.source.name(),
            constraints = %self.constraints,
            "Requesting video stream"
        );

        let stream = self.source.request(self.constraints).await?;
        let handle = AcquisitionHandle::new(stream);

        match self.bind_and_play(&handle).await {
            Ok(metadata) => {
                info!(
                    device = %handle.label(),
                    width = metadata.width,
                    height = metadata.height,
                    "Camera stream ready"
                );
                Ok(handle)
            }
            Err(err) => {
                // handle is dropped on return, which stops its tracks
                self.detach_surface();
                Err(err)
            }
        }
    }

    async fn bind_and_play(
        &mut self,
        handle: &AcquisitionHandle,
    ) -> Result<StreamMetadata, AcquisitionError> {
        let mut frames = handle.frames();
        self.surface.bind(handle.frames());
        self.surface_bound = true;

        let metadata = tokio::time::timeout(self.ready_timeout, wait_for_metadata(&mut frames))
            .await
            .map_err(|_| AcquisitionError::Timeout(self.ready_timeout))??;

        self.surface.play()?;
        Ok(metadata)
    }

    fn release_stream(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.release();
        } else {
            debug!("No camera stream to release");
        }
        self.detach_surface();
    }

    fn detach_surface(&mut self) {
        if self.surface_bound {
            self.surface.detach();
            self.surface_bound = false;
        }
    }

    fn transition(&mut self, next: CameraStatus) {
        info!(from = %self.status, to = %next, "Camera status changed");
        self.status = next.clone();
        self.current.send_replace(next.clone());
        // No subscribers is fine
        let _ = self.events.send(next);
    }
}

/// In-flight `start()`
///
/// Settled once the attempt reaches `Active` or `Error`. Dropped unsettled
/// means the caller abandoned the future while the request or the readiness
/// wait was pending.
struct PendingStart<'a> {
    camera: &'a mut CameraLifecycleController,
    settled: bool,
}

impl<'a> PendingStart<'a> {
    fn new(camera: &'a mut CameraLifecycleController) -> Self {
        Self {
            camera,
            settled: false,
        }
    }

    fn finish(mut self) -> CameraStatus {
        self.settled = true;
        self.camera.status.clone()
    }
}

impl Drop for PendingStart<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("Camera start abandoned before the stream was ready");
        self.camera.detach_surface();
        let err = AcquisitionError::Other("Camera request was cancelled".to_string());
        self.camera
            .transition(CameraStatus::Error(err.status_message()));
    }
}

impl Drop for CameraLifecycleController {
    fn drop(&mut self) {
        self.release_stream();
    }
}

impl std::fmt::Debug for CameraLifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraLifecycleController")
            .field("source", &self.source.name())
            .field("status", &self.status)
            .field("handle", &self.handle)
            .finish()
    }
}

/// Resolve once the stream has produced a frame
async fn wait_for_metadata(frames: &mut FrameWatch) -> Result<StreamMetadata, BackendError> {
    let latest = frames
        .wait_for(|frame| frame.is_some())
        .await
        .map_err(|_| BackendError::StreamEnded)?;

    match &*latest {
        Some(frame) => Ok(frame.metadata()),
        None => Err(BackendError::StreamEnded),
    }
}
