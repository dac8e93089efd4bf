//! Crate-wide error type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced outside the git use-case layer: filesystem traversal
/// during directory resolution and network access for the hosted-repository
/// listing. Use cases carry their own narrower error enums.
#[derive(Error, Debug)]
pub enum FleetError {
    /// A filesystem operation failed.
    #[error("File system operation failed: {message}")]
    FileSystem {
        /// Human-readable description of what was being attempted.
        message: String,
        /// Path involved, when known.
        path: Option<PathBuf>,
        /// Underlying I/O error.
        #[source]
        source: Option<std::io::Error>,
    },

    /// A network operation failed.
    #[error("Network operation failed: {message}")]
    Network {
        /// Human-readable description of what was being attempted.
        message: String,
        /// URL involved, when known.
        url: Option<String>,
        /// Underlying HTTP client error.
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl FleetError {
    /// Create a filesystem error without an underlying source.
    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a filesystem error wrapping an I/O error.
    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    /// Create a network error without an underlying source.
    pub fn network_error(message: impl Into<String>, url: Option<String>) -> Self {
        Self::Network {
            message: message.into(),
            url,
            source: None,
        }
    }

    /// Create a network error wrapping an HTTP client error.
    pub fn network_error_with_source(
        message: impl Into<String>,
        url: Option<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::Network {
            message: message.into(),
            url,
            source: Some(source),
        }
    }
}

impl From<std::io::Error> for FleetError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<reqwest::Error> for FleetError {
    fn from(error: reqwest::Error) -> Self {
        Self::network_error_with_source("Network request failed", None, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filesystem_error_with_path() {
        let path = PathBuf::from("/test/path");
        let error = FleetError::filesystem_error("test message", Some(path.clone()));
        if let FleetError::FileSystem { path: Some(p), .. } = error {
            assert_eq!(p, path);
        } else {
            panic!("Expected FileSystem error with path");
        }
    }

    #[test]
    fn test_network_error_display() {
        let error = FleetError::network_error("listing failed", Some("https://x".into()));
        assert_eq!(error.to_string(), "Network operation failed: listing failed");
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let fleet_error: FleetError = io_error.into();
        assert!(matches!(fleet_error, FleetError::FileSystem { .. }));
    }
}
