//! Error types for asset operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving an asset
#[derive(Error, Debug)]
pub enum AssetError {
    /// HTTP request error
    #[error("HTTP request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request did not finish within the configured timeout
    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    /// Server returned a non-success status
    #[error("Server error ({status}) fetching {url}")]
    ServerError { status: u16, url: String },

    /// Fetch failed for another reason (used by non-HTTP fetchers)
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Writing the downloaded file failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Building the HTTP client failed
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

impl AssetError {
    /// True when the bytes were fetched but could not be stored
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// Result type for asset operations
pub type Result<T> = std::result::Result<T, AssetError>;
