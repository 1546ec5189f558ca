// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use film_camera::{AppError, Config, FilterMode};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.default_filter, FilterMode::Natural);
    assert!(config.photos_dir.is_none());
    assert!(!config.mirror_preview);
}

#[test]
fn test_config_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        default_filter: FilterMode::VintageFilm,
        photos_dir: Some(dir.path().join("roll")),
        mirror_preview: true,
    };
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path), config);
}

#[test]
fn test_missing_or_invalid_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        Config::load_from(&dir.path().join("absent.json")),
        Config::default()
    );

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert_eq!(Config::load_from(&broken), Config::default());
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "mirror_preview": true }"#).unwrap();

    let config = Config::load_from(&path);
    assert!(config.mirror_preview);
    assert_eq!(config.default_filter, FilterMode::Natural);
}

#[test]
fn test_photos_dir_override() {
    let config = Config {
        photos_dir: Some("/tmp/film".into()),
        ..Config::default()
    };
    assert_eq!(config.photos_dir(), std::path::PathBuf::from("/tmp/film"));
}

#[test]
fn test_save_under_a_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();

    let result = Config::default().save_to(&blocker.join("config.json"));
    assert!(matches!(result, Err(AppError::Storage(_))));
}
