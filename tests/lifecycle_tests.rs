// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the camera lifecycle controller

mod common;

use common::{Event, RecordingSurface, Script, ScriptedSource, live_streams, new_log};
use film_camera::backends::camera::BackendError;
use film_camera::{CameraLifecycleController, CameraStatus};
use std::time::Duration;

fn controller(script: Vec<Script>, log: &common::EventLog) -> CameraLifecycleController {
    CameraLifecycleController::new(
        Box::new(ScriptedSource::new(script, log.clone())),
        Box::new(RecordingSurface { log: log.clone() }),
    )
}

#[tokio::test]
async fn test_restart_releases_before_requesting() {
    let log = new_log();
    let mut camera = controller(vec![], &log);

    assert_eq!(camera.start().await, CameraStatus::Active);
    assert_eq!(camera.switch_camera().await, CameraStatus::Active);

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            Event::Request(1),
            Event::Bind,
            Event::Play,
            Event::Stop(1),
            Event::Detach,
            Event::Request(2),
            Event::Bind,
            Event::Play,
        ]
    );
}

#[tokio::test]
async fn test_at_most_one_live_stream() {
    let log = new_log();
    let mut camera = controller(
        vec![
            Script::Frame(4, 4),
            Script::Fail(BackendError::NotReadable("busy".into())),
            Script::Frame(8, 8),
            Script::Frame(2, 2),
        ],
        &log,
    );

    for _ in 0..6 {
        camera.start().await;
        assert!(live_streams(&log) <= 1);
        assert_eq!(live_streams(&log), usize::from(camera.has_stream()));
    }

    drop(camera);
    assert_eq!(live_streams(&log), 0);
}

#[tokio::test]
async fn test_stop_is_idempotent_and_keeps_status() {
    let log = new_log();
    let mut camera = controller(vec![], &log);
    camera.start().await;

    camera.stop();
    camera.stop();
    camera.stop();

    assert_eq!(camera.status(), &CameraStatus::Active);
    assert!(!camera.has_stream());
    assert!(camera.current_frame().is_none());

    let stops = log
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, Event::Stop(_)))
        .count();
    assert_eq!(stops, 1);
}

#[tokio::test]
async fn test_permission_denied_then_retry() {
    let log = new_log();
    let mut camera = controller(
        vec![Script::Fail(BackendError::PermissionDenied(
            "NotAllowedError".into(),
        ))],
        &log,
    );
    let mut events = camera.subscribe();

    let status = camera.start().await;
    assert_eq!(
        status,
        CameraStatus::Error(
            "Camera access denied. Please allow camera access and try again.".to_string()
        )
    );
    assert!(!camera.has_stream());

    assert_eq!(camera.retry().await, CameraStatus::Active);

    let mut seen = Vec::new();
    while let Ok(status) = events.try_recv() {
        seen.push(status);
    }
    assert_eq!(
        seen,
        vec![
            CameraStatus::Requesting,
            CameraStatus::Error(
                "Camera access denied. Please allow camera access and try again.".to_string()
            ),
            CameraStatus::Requesting,
            CameraStatus::Active,
        ]
    );
}

#[tokio::test]
async fn test_missing_device_message() {
    let log = new_log();
    let mut camera = controller(
        vec![Script::Fail(BackendError::DeviceNotFound("none".into()))],
        &log,
    );

    assert_eq!(
        camera.start().await.error_message(),
        Some("No camera found on this device.")
    );
}

#[tokio::test(start_paused = true)]
async fn test_silent_stream_times_out_and_is_released() {
    let log = new_log();
    let mut camera = controller(vec![Script::Silent], &log);

    let status = camera.start().await;

    assert_eq!(
        status.error_message(),
        Some("Failed to access camera: Video did not become ready within 5s")
    );
    assert_eq!(live_streams(&log), 0);
    assert!(log.lock().unwrap().contains(&Event::Detach));
    assert!(!log.lock().unwrap().contains(&Event::Play));
}

#[tokio::test]
async fn test_watch_reports_latest_status() {
    let log = new_log();
    let mut camera = controller(vec![], &log);
    let status = camera.watch_status();
    assert_eq!(*status.borrow(), CameraStatus::Idle);

    camera.start().await;
    assert_eq!(*status.borrow(), CameraStatus::Active);
}

#[tokio::test]
async fn test_frame_comes_from_current_stream() {
    let log = new_log();
    let mut camera = controller(vec![Script::Frame(4, 4), Script::Frame(6, 2)], &log);

    camera.start().await;
    assert_eq!(camera.current_frame().map(|f| f.width), Some(4));

    camera.start().await;
    assert_eq!(camera.current_frame().map(|f| f.width), Some(6));
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_start_detaches_surface() {
    let log = new_log();
    let mut camera = controller(vec![Script::Silent], &log);

    let abandoned = tokio::time::timeout(Duration::from_secs(1), camera.start()).await;
    assert!(abandoned.is_err());

    assert_eq!(
        camera.status().error_message(),
        Some("Failed to access camera: Camera request was cancelled")
    );
    assert!(!camera.has_stream());
    assert_eq!(live_streams(&log), 0);
    {
        let log = log.lock().unwrap();
        assert!(log.contains(&Event::Stop(1)));
        assert!(log.contains(&Event::Detach));
        assert!(!log.contains(&Event::Play));
    }

    // Surface was already detached; dropping must not detach again
    drop(camera);
    let detaches = log
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, Event::Detach))
        .count();
    assert_eq!(detaches, 1);
}

#[tokio::test(start_paused = true)]
async fn test_start_after_abandoned_start() {
    let log = new_log();
    let mut camera = controller(vec![Script::Silent, Script::Frame(4, 4)], &log);

    let _ = tokio::time::timeout(Duration::from_secs(1), camera.start()).await;
    assert_eq!(camera.start().await, CameraStatus::Active);
    assert_eq!(live_streams(&log), 1);
}
