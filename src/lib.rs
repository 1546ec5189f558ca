// SPDX-License-Identifier: MPL-2.0

//! Film Camera - a camera that behaves like a roll of film
//!
//! A live feed is previewed with one of a few film looks. Each shot is
//! developed at the frame's native size, given synthetic grain, encoded as
//! JPEG and costs one of 24 exposures.
//!
//! # Architecture
//!
//! - [`backends`]: video sources, the camera lifecycle and the preview surface
//! - [`pipelines`]: film looks, grain, encoding and the capture compositor
//! - [`session`]: one camera plus one roll of film
//! - [`storage`]: exporting photos
//! - [`config`]: user preferences
//!
//! # Example
//!
//! ```no_run
//! use film_camera::backends::camera::FramePreview;
//! use film_camera::backends::virtual_camera::StillImageSource;
//! use film_camera::storage::Exporter;
//! use film_camera::CaptureSession;
//!
//! # async fn run() {
//! let mut session = CaptureSession::new(
//!     Box::new(StillImageSource::new("scene.png")),
//!     Box::new(FramePreview::new()),
//!     Exporter::to_dir("photos"),
//! );
//! session.start().await;
//! if session.capture().is_some() {
//!     session.export_last();
//! }
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use backends::camera::{CameraLifecycleController, CameraStatus};
pub use config::Config;
pub use errors::{AcquisitionError, AppError, AppResult};
pub use pipelines::photo::{CaptureCompositor, CapturedArtifact, FilmBudget, FilterMode};
pub use session::CaptureSession;
