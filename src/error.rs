//! Error types for SoundCloud operations.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for all SoundCloud operations.
#[derive(Debug, Error)]
pub enum SoundCloudError {
    /// Required configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The profile URL could not be mapped to a user.
    #[error("Could not resolve user: {0}")]
    Resolution(String),

    /// HTTP request failed (timeout, connection, body decoding).
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL, without query parameters.
        url: String,
        /// Response status code.
        status: u16,
        /// Response body, usually the API's JSON error document.
        body: String,
    },

    /// Copying a remote stream to disk failed partway.
    #[error("Transfer to {} failed: {reason}", .path.display())]
    Transfer {
        /// Destination file.
        path: PathBuf,
        /// Underlying failure message.
        reason: String,
    },

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SoundCloudError {
    /// Whether this error came from the network layer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { .. })
    }

    /// Message suitable for a fatal error report.
    ///
    /// Prefers the API's own error body when the server sent one.
    pub fn report(&self) -> String {
        match self {
            Self::Status { body, .. } if !body.trim().is_empty() => {
                format!("{}: {}", self, body.trim())
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for SoundCloud operations.
pub type Result<T> = std::result::Result<T, SoundCloudError>;
