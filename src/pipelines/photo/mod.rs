// SPDX-License-Identifier: MPL-2.0

//! Still capture pipeline
//!
//! ```text
//! Current frame → Render (native size) → Film look → Grain → JPEG
//!                                                              ↓
//!                                                 last capture (single slot)
//! ```
//!
//! The [`CaptureCompositor`] owns the film budget. A capture with no film
//! left or no frame available is a silent no-op; [`CaptureCompositor::try_capture`]
//! additionally reports why it was skipped.

pub mod encoding;
pub mod filters;
pub mod grain;
pub mod processing;
pub mod signals;

pub use encoding::{EncodedImage, PhotoEncoder};
pub use filters::{Adjustment, FilterDescriptor, FilterMode};
pub use processing::{PostProcessor, render_frame};
pub use signals::TransientSignal;

use crate::backends::camera::types::CameraFrame;
use crate::constants::{film, timing};
use crate::errors::PhotoError;
use chrono::{DateTime, Local};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Remaining exposures on the roll
///
/// Only ever decreases; there is no way to reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilmBudget {
    remaining: u32,
}

impl FilmBudget {
    pub fn new(remaining: u32) -> Self {
        Self { remaining }
    }

    /// A fresh roll
    pub fn full() -> Self {
        Self::new(film::ROLL_SIZE)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Use one exposure; `false` if the roll is already finished
    pub fn expose(&mut self) -> bool {
        match self.remaining.checked_sub(1) {
            Some(left) => {
                self.remaining = left;
                true
            }
            None => false,
        }
    }
}

impl Default for FilmBudget {
    fn default() -> Self {
        Self::full()
    }
}

/// An encoded still
#[derive(Debug, Clone)]
pub struct CapturedArtifact {
    pub data: Arc<[u8]>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub filter: FilterMode,
    pub created_at: DateTime<Local>,
}

impl CapturedArtifact {
    /// File extension matching the mime type
    pub fn extension(&self) -> &'static str {
        "jpg"
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reason a capture produced nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSkipped {
    /// Film budget is exhausted
    NoFilmLeft,
    /// No frame available from the camera
    NoFrame,
    /// The camera is not active
    CameraInactive,
    /// Rendering or encoding failed
    Failed(PhotoError),
}

impl std::fmt::Display for CaptureSkipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureSkipped::NoFilmLeft => write!(f, "no film left"),
            CaptureSkipped::NoFrame => write!(f, "no frame available"),
            CaptureSkipped::CameraInactive => write!(f, "camera is not active"),
            CaptureSkipped::Failed(e) => write!(f, "{}", e),
        }
    }
}

impl From<PhotoError> for CaptureSkipped {
    fn from(err: PhotoError) -> Self {
        CaptureSkipped::Failed(err)
    }
}

/// Turns camera frames into film stills
pub struct CaptureCompositor {
    budget: FilmBudget,
    processor: PostProcessor,
    encoder: PhotoEncoder,
    rng: StdRng,
    last_capture: Option<CapturedArtifact>,
    flash: TransientSignal,
    capturing: TransientSignal,
}

impl CaptureCompositor {
    /// Compositor with a full roll and an entropy-seeded grain source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Compositor with reproducible grain
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            budget: FilmBudget::full(),
            processor: PostProcessor::default(),
            encoder: PhotoEncoder::default(),
            rng,
            last_capture: None,
            flash: TransientSignal::new(timing::FLASH_DURATION),
            capturing: TransientSignal::new(timing::CAPTURING_DURATION),
        }
    }

    /// Replace the starting budget
    pub fn with_budget(mut self, budget: FilmBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> FilmBudget {
        self.budget
    }

    /// Most recent capture, if any
    pub fn last_capture(&self) -> Option<&CapturedArtifact> {
        self.last_capture.as_ref()
    }

    /// Whether the shutter flash is showing at `now`
    pub fn is_flashing(&self, now: Instant) -> bool {
        self.flash.is_active_at(now)
    }

    /// Whether the "capturing" indicator is showing at `now`
    pub fn is_capturing(&self, now: Instant) -> bool {
        self.capturing.is_active_at(now)
    }

    /// Take a photo of `frame`
    ///
    /// Returns `None` without any side effect when the roll is finished or
    /// there is no frame.
    pub fn capture(
        &mut self,
        frame: Option<&CameraFrame>,
        filter: FilterMode,
    ) -> Option<CapturedArtifact> {
        match self.try_capture(frame, filter) {
            Ok(artifact) => Some(artifact),
            Err(reason) => {
                debug!(%reason, "Capture skipped");
                None
            }
        }
    }

    /// Like [`capture`](Self::capture) but reports why nothing was taken
    pub fn try_capture(
        &mut self,
        frame: Option<&CameraFrame>,
        filter: FilterMode,
    ) -> Result<CapturedArtifact, CaptureSkipped> {
        if self.budget.is_empty() {
            return Err(CaptureSkipped::NoFilmLeft);
        }
        let frame = frame.ok_or(CaptureSkipped::NoFrame)?;

        let developed = self.processor.process(frame, filter, &mut self.rng)?;
        let encoded = self.encoder.encode(&developed)?;

        let artifact = CapturedArtifact {
            data: Arc::from(encoded.data),
            mime_type: encoded.mime_type,
            width: encoded.width,
            height: encoded.height,
            filter,
            created_at: Local::now(),
        };

        self.budget.expose();
        let now = Instant::now();
        self.flash.raise(now);
        self.capturing.raise(now);
        self.last_capture = Some(artifact.clone());

        info!(
            width = artifact.width,
            height = artifact.height,
            filter = %filter,
            size = artifact.len(),
            remaining = self.budget.remaining(),
            "Photo captured"
        );

        Ok(artifact)
    }
}

impl Default for CaptureCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CaptureCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureCompositor")
            .field("budget", &self.budget)
            .field("last_capture", &self.last_capture.as_ref().map(|a| a.created_at))
            .finish()
    }
}
