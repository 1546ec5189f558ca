// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! - Listing the film looks
//! - Shooting a few frames from a camera or a still image

use film_camera::backends::camera::{CameraStatus, FramePreview, VideoSource};
use film_camera::backends::virtual_camera::StillImageSource;
use film_camera::pipelines::photo::FilterMode;
use film_camera::storage::Exporter;
use film_camera::{CaptureSession, Config};
use std::path::PathBuf;

/// Print every film look and what it does
pub fn list_filters() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();

    println!("Film looks:");
    println!();
    for mode in FilterMode::ALL {
        let marker = if mode == config.default_filter { "*" } else { " " };
        println!(" {} {:<14} {}", marker, mode.id(), mode.descriptor());
    }

    Ok(())
}

/// Options for `shoot`
pub struct ShootOptions {
    pub source: Option<PathBuf>,
    pub device: Option<String>,
    pub filter: Option<FilterMode>,
    pub count: u32,
    pub output: Option<PathBuf>,
}

/// Start the camera, take `count` photos and export each one
pub fn shoot(options: ShootOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let source = select_source(options.source, options.device)?;
    let output_dir = options.output.unwrap_or_else(|| config.photos_dir());
    let filter = options.filter.unwrap_or(config.default_filter);

    let preview = FramePreview::new();
    preview.set_mirror(config.mirror_preview);

    let mut session = CaptureSession::new(
        source,
        Box::new(preview),
        Exporter::to_dir(&output_dir),
    );
    session.set_filter(filter);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        println!("Starting camera...");
        if let CameraStatus::Error(message) = session.start().await {
            return Err::<(), Box<dyn std::error::Error>>(message.into());
        }
        println!("Loaded film, {} exposures left", session.budget().remaining());

        let mut saved = 0;
        for _ in 0..options.count {
            match session.try_capture() {
                Ok(artifact) => {
                    if let Some(path) = session.export_last() {
                        saved += 1;
                        println!(
                            "Photo saved: {} ({}x{}, {})",
                            path.display(),
                            artifact.width,
                            artifact.height,
                            artifact.filter
                        );
                    }
                }
                Err(reason) => {
                    println!("Shot skipped: {}", reason);
                    break;
                }
            }
            tokio::task::yield_now().await;
        }

        session.stop();
        println!(
            "{} photo(s) saved to {}, {} exposures left",
            saved,
            output_dir.display(),
            session.budget().remaining()
        );
        Ok(())
    })
}

fn select_source(
    source: Option<PathBuf>,
    device: Option<String>,
) -> Result<Box<dyn VideoSource>, Box<dyn std::error::Error>> {
    if let Some(path) = source {
        return Ok(Box::new(StillImageSource::new(path)));
    }
    camera_source(device)
}

#[cfg(feature = "pipewire")]
fn camera_source(device: Option<String>) -> Result<Box<dyn VideoSource>, Box<dyn std::error::Error>> {
    use film_camera::backends::camera::pipewire::PipeWireSource;

    Ok(match device {
        Some(node) => Box::new(PipeWireSource::with_target(node)),
        None => Box::new(PipeWireSource::new()),
    })
}

#[cfg(not(feature = "pipewire"))]
fn camera_source(device: Option<String>) -> Result<Box<dyn VideoSource>, Box<dyn std::error::Error>> {
    match device {
        Some(node) => Err(format!(
            "Cannot open camera '{}': built without the 'pipewire' feature",
            node
        )
        .into()),
        None => Err("No camera available: pass --source <image> or build with the 'pipewire' feature".into()),
    }
}
