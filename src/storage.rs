// SPDX-License-Identifier: MPL-2.0

//! Export of captured photos
//!
//! Export is fire-and-forget: sinks log failures and never hand them back to
//! the capture path.

use crate::pipelines::photo::CapturedArtifact;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Destination for captured photos
pub trait ExportSink: Send + Sync {
    /// Save `artifact` under `filename`
    ///
    /// Returns where it ended up, or `None` if the save failed (already logged).
    fn save(&self, artifact: &CapturedArtifact, filename: &str) -> Option<PathBuf>;
}

/// Filename for a photo taken at `time`, e.g. `film_20240101_120000_123.jpg`
pub fn suggested_filename(time: DateTime<Local>, extension: &str) -> String {
    format!("film_{}.{}", time.format("%Y%m%d_%H%M%S_%3f"), extension)
}

/// Default export directory (`Pictures/film-camera`)
pub fn default_photo_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("film-camera")
}

/// Writes photos into a directory
#[derive(Debug, Clone)]
pub struct DirectoryExport {
    dir: PathBuf,
}

impl DirectoryExport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectoryExport {
    fn save(&self, artifact: &CapturedArtifact, filename: &str) -> Option<PathBuf> {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), error = %e, "Failed to create export directory");
            return None;
        }

        let path = self.dir.join(filename);
        match std::fs::write(&path, &artifact.data[..]) {
            Ok(()) => {
                info!(path = %path.display(), size = artifact.len(), "Photo exported");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to export photo");
                None
            }
        }
    }
}

/// Names artifacts and hands them to a sink
pub struct Exporter {
    sink: Box<dyn ExportSink>,
}

impl Exporter {
    pub fn new(sink: Box<dyn ExportSink>) -> Self {
        Self { sink }
    }

    /// Export into a directory
    pub fn to_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(DirectoryExport::new(dir)))
    }

    /// Export `artifact` with a filename derived from its capture time
    pub fn export(&self, artifact: &CapturedArtifact) -> Option<PathBuf> {
        let filename = suggested_filename(artifact.created_at, artifact.extension());
        self.sink.save(artifact, &filename)
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::photo::FilterMode;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn artifact() -> CapturedArtifact {
        CapturedArtifact {
            data: Arc::from(vec![0xFFu8, 0xD8, 0xFF, 0xD9]),
            mime_type: "image/jpeg",
            width: 1,
            height: 1,
            filter: FilterMode::Natural,
            created_at: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
        }
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(
            suggested_filename(artifact().created_at, "jpg"),
            "film_20240309_140507_000.jpg"
        );
    }

    #[test]
    fn test_directory_export_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::to_dir(dir.path().join("roll"));

        let path = exporter.export(&artifact()).unwrap();
        assert_eq!(path.file_name().unwrap(), "film_20240309_140507_000.jpg");
        assert_eq!(std::fs::read(path).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn test_export_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        assert!(Exporter::to_dir(&blocker).export(&artifact()).is_none());
    }
}
