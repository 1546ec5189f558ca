// SPDX-License-Identifier: MPL-2.0

//! PipeWire GStreamer pipeline for camera capture

use super::super::types::*;
use crate::constants::{stream, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// How long to watch the bus for an early device error after PLAYING
const STARTUP_ERROR_WINDOW_MS: u64 = 500;

/// PipeWire camera pipeline
///
/// `pipewiresrc ! videoconvert ! videoscale ! RGBA appsink`, publishing every
/// decoded frame into a latest-frame channel.
pub struct PipeWirePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    stopped: bool,
}

impl PipeWirePipeline {
    /// Build and start a pipeline for `target` (a PipeWire node, or the
    /// default camera when `None`)
    pub fn new(
        target: Option<&str>,
        constraints: StreamConstraints,
        publisher: FramePublisher,
    ) -> BackendResult<Self> {
        info!(?target, %constraints, "Creating PipeWire pipeline");

        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let source = match target {
            Some(node) => format!("pipewiresrc target-object={}", node),
            None => "pipewiresrc".to_string(),
        };
        let description = format!(
            "{} ! videoconvert ! videoscale ! video/x-raw,format=RGBA,width={},height={} ! appsink name=sink",
            source, constraints.ideal_width, constraints.ideal_height
        );
        debug!(pipeline = %description, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Launch result is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", stream::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frame_counter = AtomicU64::new(0);
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);
                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;

                    match sample_to_frame(&sample) {
                        Some(frame) => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                debug!(
                                    frame = frame_num,
                                    width = frame.width,
                                    height = frame.height,
                                    "Frame received"
                                );
                            }
                            publisher.send_replace(Some(Arc::new(frame)));
                        }
                        None => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                warn!(frame = frame_num, "Skipping unusable sample");
                            }
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        let mut this = Self {
            pipeline,
            appsink,
            stopped: false,
        };

        this.pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e)))?;

        if let Some(err) = this.startup_error() {
            error!(error = %err, "PipeWire pipeline failed to start");
            this.shutdown();
            return Err(err);
        }

        info!("PipeWire camera pipeline playing");
        Ok(this)
    }

    /// First error posted on the bus shortly after start, classified
    fn startup_error(&self) -> Option<BackendError> {
        let bus = self.pipeline.bus()?;
        let msg = bus.timed_pop_filtered(
            gstreamer::ClockTime::from_mseconds(STARTUP_ERROR_WINDOW_MS),
            &[gstreamer::MessageType::Error],
        )?;

        match msg.view() {
            gstreamer::MessageView::Error(err) => Some(classify_error(err.error())),
            _ => None,
        }
    }

    /// Stop the pipeline and release the device
    pub fn stop(&mut self) {
        if !self.stopped {
            info!("Stopping PipeWire pipeline");
            self.shutdown();
        }
    }

    fn shutdown(&mut self) {
        self.stopped = true;
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to set pipeline to NULL");
            return;
        }

        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, "PipeWire pipeline stopped");
    }
}

impl Drop for PipeWirePipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Map a GStreamer error onto the backend taxonomy
fn classify_error(err: &gstreamer::glib::Error) -> BackendError {
    let message = err.message().to_string();
    match err.kind::<gstreamer::ResourceError>() {
        Some(gstreamer::ResourceError::NotAuthorized) | Some(gstreamer::ResourceError::OpenRead) => {
            BackendError::PermissionDenied(message)
        }
        Some(gstreamer::ResourceError::NotFound) => BackendError::DeviceNotFound(message),
        Some(gstreamer::ResourceError::Busy) => BackendError::NotReadable(message),
        _ => BackendError::Other(message),
    }
}

fn sample_to_frame(sample: &gstreamer::Sample) -> Option<CameraFrame> {
    let buffer = sample.buffer()?;
    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
        return None;
    }

    let video_info = VideoInfo::from_caps(sample.caps()?).ok()?;
    let format = PixelFormat::from_gst_format(video_info.format().to_str())?;
    let map = buffer.map_readable().ok()?;

    Some(CameraFrame {
        width: video_info.width(),
        height: video_info.height(),
        data: FrameData::from(map.as_slice()),
        format,
        stride: video_info.stride()[0] as u32,
        captured_at: Instant::now(),
    })
}
