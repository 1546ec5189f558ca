// SPDX-License-Identifier: MPL-2.0

//! Scripted video source shared by the integration tests
//!
//! Every request and every stop is appended to one event log so tests can
//! check ordering across streams.

#![allow(dead_code)]

use film_camera::backends::camera::{
    BackendError, BackendResult, CameraFrame, FramePublisher, FrameWatch, MediaStream,
    PreviewSurface, StreamConstraints, VideoSource,
};
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Request(usize),
    Rejected(usize),
    Stop(usize),
    Bind,
    Play,
    Detach,
}

/// What the next request should do
#[derive(Debug, Clone)]
pub enum Script {
    /// Stream that already holds a frame of this size
    Frame(u32, u32),
    /// Stream that never delivers a frame
    Silent,
    /// Request fails outright
    Fail(BackendError),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub struct ScriptedSource {
    script: Mutex<VecDeque<Script>>,
    log: EventLog,
    next_id: Mutex<usize>,
}

impl ScriptedSource {
    /// Source that plays `script` in order, then keeps serving 4x4 frames
    pub fn new(script: Vec<Script>, log: EventLog) -> Self {
        Self {
            script: Mutex::new(script.into()),
            log,
            next_id: Mutex::new(0),
        }
    }
}

impl VideoSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn request(
        &self,
        constraints: StreamConstraints,
    ) -> BoxFuture<'static, BackendResult<Box<dyn MediaStream>>> {
        assert_eq!(constraints, StreamConstraints::default());

        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Script::Frame(4, 4));
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        self.log.lock().unwrap().push(Event::Request(id));
        let log = Arc::clone(&self.log);

        Box::pin(async move {
            let initial = match step {
                Script::Fail(err) => {
                    log.lock().unwrap().push(Event::Rejected(id));
                    return Err(err);
                }
                Script::Silent => None,
                Script::Frame(w, h) => Some(Arc::new(CameraFrame::from_rgba(
                    w,
                    h,
                    vec![128u8; (w * h * 4) as usize],
                ))),
            };
            let (publisher, frames) = tokio::sync::watch::channel(initial);
            Ok(Box::new(ScriptedStream {
                id,
                frames,
                publisher,
                log,
                live: true,
            }) as Box<dyn MediaStream>)
        })
    }
}

pub struct ScriptedStream {
    id: usize,
    frames: FrameWatch,
    publisher: FramePublisher,
    log: EventLog,
    live: bool,
}

impl MediaStream for ScriptedStream {
    fn label(&self) -> &str {
        "scripted"
    }

    fn frames(&self) -> FrameWatch {
        self.frames.clone()
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.publisher.send_replace(None);
            self.log.lock().unwrap().push(Event::Stop(self.id));
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

/// Surface that records bind/play/detach into the shared log
pub struct RecordingSurface {
    pub log: EventLog,
}

impl PreviewSurface for RecordingSurface {
    fn bind(&mut self, _frames: FrameWatch) {
        self.log.lock().unwrap().push(Event::Bind);
    }

    fn play(&mut self) -> BackendResult<()> {
        self.log.lock().unwrap().push(Event::Play);
        Ok(())
    }

    fn detach(&mut self) {
        self.log.lock().unwrap().push(Event::Detach);
    }
}

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Streams requested but not yet stopped
pub fn live_streams(log: &EventLog) -> usize {
    let events = log.lock().unwrap();
    let requested = events
        .iter()
        .filter(|e| matches!(e, Event::Request(_)))
        .count();
    let ended = events
        .iter()
        .filter(|e| matches!(e, Event::Stop(_) | Event::Rejected(_)))
        .count();
    requested - ended
}
