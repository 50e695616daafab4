//! Error types for image generation.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while generating and saving an image.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    /// No API key could be resolved.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or HTTP transport error.
    ///
    /// The request URL is stripped before the error is stored, since it
    /// carries the API key in its query string.
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// The request/response exchange exceeded the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// API returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The response parsed but carried no candidates.
    #[error("No candidates returned.\nFull response: {response}")]
    NoCandidates { response: String },

    /// No candidate part carried inline image data.
    #[error("No image found in response parts.\nFull response: {response}")]
    NoImage { response: String },

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Creating the parent directory or writing the output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImageGenError {
    /// Maps a transport error, keeping timeouts distinct.
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err.without_url())
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for image generation operations.
pub type Result<T> = std::result::Result<T, ImageGenError>;
