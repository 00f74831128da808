//! Error types for document export

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the conversion of one document
///
/// Problems local to a block or an asset never surface here; they are
/// reported as [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The output file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template could not be loaded
    #[error("Template error: {0}")]
    Template(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
