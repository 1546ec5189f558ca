// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera application

use crate::backends::camera::types::BackendError;
use std::fmt;
use std::time::Duration;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
}

/// Why an acquisition attempt failed
///
/// Every variant ends up as display text on the `Error` camera status; the
/// split only decides which message the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// Access to the camera was refused
    PermissionDenied(String),
    /// No usable camera device exists
    DeviceNotFound(String),
    /// The stream did not deliver a frame before the deadline
    Timeout(Duration),
    /// Anything else the source reported
    Other(String),
}

impl AcquisitionError {
    /// Human-readable message attached to the `Error` status
    pub fn status_message(&self) -> String {
        match self {
            AcquisitionError::PermissionDenied(_) => {
                "Camera access denied. Please allow camera access and try again.".to_string()
            }
            AcquisitionError::DeviceNotFound(_) => "No camera found on this device.".to_string(),
            AcquisitionError::Timeout(_) | AcquisitionError::Other(_) => {
                format!("Failed to access camera: {}", self)
            }
        }
    }
}

/// Photo pipeline errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Frame header and buffer disagree
    InvalidFrame(String),
    /// Encoding failed
    EncodingFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AcquisitionError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            AcquisitionError::Timeout(after) => {
                write!(f, "Video did not become ready within {:?}", after)
            }
            AcquisitionError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for AcquisitionError {}
impl std::error::Error for PhotoError {}

// Backend failures collapse into the three reported categories
impl From<BackendError> for AcquisitionError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::PermissionDenied(msg) => AcquisitionError::PermissionDenied(msg),
            BackendError::DeviceNotFound(msg) => AcquisitionError::DeviceNotFound(msg),
            other => AcquisitionError::Other(other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
