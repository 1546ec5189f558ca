// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              CaptureSession                  │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌──────────────────┐  ┌──────────────────┐ │
//! │  │ Camera lifecycle │  │  Virtual camera  │ │
//! │  │ + PipeWire source│  │  (still image)   │ │
//! │  └──────────────────┘  └──────────────────┘ │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! - [`camera`]: source/stream traits, lifecycle controller, preview surface
//! - [`virtual_camera`]: sources that need no hardware

pub mod camera;
pub mod virtual_camera;
