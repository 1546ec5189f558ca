// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌──────────────────────────┐
//! │ CameraLifecycleController│  ← Acquire, release, status
//! └─────┬──────────────┬─────┘
//!       │              │
//!       ▼              ▼
//! ┌───────────┐  ┌──────────────┐
//! │VideoSource│  │PreviewSurface│
//! └─────┬─────┘  └──────────────┘
//!       │ request()
//!       ▼
//! ┌───────────┐
//! │MediaStream│  ← frames(), stop()
//! └───────────┘
//! ```
//!
//! Concrete sources live in [`crate::backends::virtual_camera`] (still image)
//! and, with the `pipewire` feature, in [`pipewire`].

pub mod lifecycle;
#[cfg(feature = "pipewire")]
pub mod pipewire;
pub mod preview;
pub mod types;

pub use lifecycle::{AcquisitionHandle, CameraLifecycleController, CameraStatus};
pub use preview::FramePreview;
pub use types::*;

use futures::future::BoxFuture;

/// Provider of live video streams
///
/// A source hands out a fresh [`MediaStream`] per request. It never keeps a
/// reference to streams it created; releasing them is the caller's job.
pub trait VideoSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Request a new stream satisfying (or approximating) the constraints
    fn request(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, BackendResult<Box<dyn MediaStream>>>;
}

/// A live stream with one or more tracks
pub trait MediaStream: Send + Sync {
    /// Label of the underlying device
    fn label(&self) -> &str;

    /// Latest-frame channel for this stream
    fn frames(&self) -> FrameWatch;

    /// Stop every track and release the device
    ///
    /// Must be idempotent.
    fn stop(&mut self);

    /// Whether the tracks are still running
    fn is_live(&self) -> bool;
}

/// Surface that displays a bound stream
pub trait PreviewSurface: Send {
    /// Attach the frame channel of a freshly acquired stream
    fn bind(&mut self, frames: FrameWatch);

    /// Begin displaying frames
    fn play(&mut self) -> BackendResult<()>;

    /// Drop the bound stream, if any
    fn detach(&mut self);
}
