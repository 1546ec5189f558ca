// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │  JPEG bytes  │
//! │ (RGBA/BGRA/  │     │  - Film look      │     │  (last shot) │
//! │  RGB/Gray)   │     │  - Grain          │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! - [`photo`]: filters, grain, JPEG encoding and the film budget

pub mod photo;
