// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use film_camera::FilmBudget;
use film_camera::backends::camera::StreamConstraints;
use film_camera::constants::{film, stream, timing};
use std::time::Duration;

#[test]
fn test_roll_size() {
    assert_eq!(film::ROLL_SIZE, 24);
    assert_eq!(FilmBudget::full().remaining(), film::ROLL_SIZE);
}

#[test]
fn test_requested_resolution() {
    let constraints = StreamConstraints::default();
    assert_eq!(
        (constraints.ideal_width, constraints.ideal_height),
        (stream::TARGET_WIDTH, stream::TARGET_HEIGHT)
    );
    assert_eq!((stream::TARGET_WIDTH, stream::TARGET_HEIGHT), (1280, 720));
}

#[test]
fn test_timings() {
    assert_eq!(timing::READY_TIMEOUT, Duration::from_secs(5));
    assert_eq!(timing::FLASH_DURATION, Duration::from_millis(150));
    assert_eq!(timing::CAPTURING_DURATION, Duration::from_millis(300));
}

#[test]
fn test_encoding_settings() {
    assert_eq!(film::JPEG_QUALITY, 90);
    assert_eq!(film::MIME_TYPE, "image/jpeg");
    assert_eq!(film::GRAIN_AMPLITUDE, 10.0);
}

#[test]
fn test_version_is_set() {
    assert!(!film_camera::constants::app_info::version().is_empty());
}
