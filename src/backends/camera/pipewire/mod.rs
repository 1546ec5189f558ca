// SPDX-License-Identifier: MPL-2.0

//! PipeWire camera source
//!
//! Captures from a PipeWire camera node through GStreamer. Building the
//! pipeline blocks (state changes, bus polling), so it runs on tokio's
//! blocking pool.

mod pipeline;

pub use pipeline::PipeWirePipeline;

use super::types::*;
use super::{MediaStream, VideoSource};
use futures::future::BoxFuture;
use tracing::info;

/// Video source backed by PipeWire
#[derive(Debug, Clone, Default)]
pub struct PipeWireSource {
    /// Node serial or name; `None` lets PipeWire pick the default camera
    target: Option<String>,
}

impl PipeWireSource {
    /// Default camera
    pub fn new() -> Self {
        Self::default()
    }

    /// Specific PipeWire node
    pub fn with_target(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
        }
    }
}

impl VideoSource for PipeWireSource {
    fn name(&self) -> &str {
        self.target.as_deref().unwrap_or("pipewire")
    }

    fn request(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, BackendResult<Box<dyn MediaStream>>> {
        let target = self.target.clone();

        Box::pin(async move {
            let label = target.clone().unwrap_or_else(|| "pipewire".to_string());
            let (publisher, frames) = tokio::sync::watch::channel(None);

            let pipeline = tokio::task::spawn_blocking(move || {
                PipeWirePipeline::new(target.as_deref(), constraints, publisher)
            })
            .await
            .map_err(|e| BackendError::Other(format!("Pipeline task failed: {}", e)))??;

            info!(device = %label, "PipeWire stream opened");

            Ok(Box::new(PipeWireStream {
                label,
                frames,
                pipeline: Some(pipeline),
            }) as Box<dyn MediaStream>)
        })
    }
}

/// Live PipeWire stream
pub struct PipeWireStream {
    label: String,
    frames: FrameWatch,
    pipeline: Option<PipeWirePipeline>,
}

impl MediaStream for PipeWireStream {
    fn label(&self) -> &str {
        &self.label
    }

    fn frames(&self) -> FrameWatch {
        self.frames.clone()
    }

    fn stop(&mut self) {
        if let Some(mut pipeline) = self.pipeline.take() {
            pipeline.stop();
        }
    }

    fn is_live(&self) -> bool {
        self.pipeline.is_some()
    }
}
