//! Error types for ParrotBar.
//!
//! The animation engine itself never fails: missing resources degrade to empty
//! sequences and bad frames are skipped. This type covers the application
//! surface around it (configuration, CLI, exports).

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during application execution.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum ParrotBarError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// A set resolved to zero frames.
    #[error("Image set not found: {0}")]
    SetNotFound(String),
    /// The resource bundle is missing or unreadable.
    #[error("Resource error: {0}")]
    ResourceError(String),
    /// Encoding or decoding an image failed.
    #[error("Image error: {0}")]
    ImageError(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// A background runtime could not be started.
    #[error("Runtime error: {0}")]
    RuntimeError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for ParrotBarError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for ParrotBarError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<image::ImageError> for ParrotBarError {
    fn from(err: image::ImageError) -> Self { Self::ImageError(err.to_string()) }
}

impl From<crate::config::ConfigError> for ParrotBarError {
    fn from(err: crate::config::ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<String> for ParrotBarError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for ParrotBarError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_display() {
        let err = ParrotBarError::InvalidArguments("Expected a set name".to_string());
        assert_eq!(err.to_string(), "Expected a set name");
    }

    #[test]
    fn test_set_not_found_display() {
        let err = ParrotBarError::SetNotFound("mustacheparrot".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Image set not found"));
        assert!(msg.contains("mustacheparrot"));
    }

    #[test]
    fn test_resource_error_display() {
        let err = ParrotBarError::ResourceError("/missing/Resources".to_string());
        assert!(err.to_string().contains("Resource error"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ParrotBarError::ConfigError("Invalid JSON".to_string());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: ParrotBarError = io_err.into();
        assert!(matches!(err, ParrotBarError::IoError(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_image_error_from_conversion() {
        let image_err = image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::DimensionError,
        ));
        let err: ParrotBarError = image_err.into();
        assert!(matches!(err, ParrotBarError::ImageError(_)));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: ParrotBarError = crate::config::ConfigError::NotFound.into();
        assert!(matches!(err, ParrotBarError::ConfigError(_)));
    }

    #[test]
    fn test_runtime_error_display() {
        let err = ParrotBarError::RuntimeError("cadence thread failed to start".to_string());
        assert_eq!(err.to_string(), "Runtime error: cadence thread failed to start");
    }

    #[test]
    fn test_from_str() {
        let err: ParrotBarError = "test error".into();
        assert!(matches!(err, ParrotBarError::CommandError(_)));
    }

    #[test]
    fn test_error_serializes_with_kind() {
        let err = ParrotBarError::SetNotFound("fiestaparrot".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("SetNotFound"));
        assert!(json.contains("fiestaparrot"));
    }
}
