//! Error type shared by the loader, exporters and the viewer server

use thiserror::Error;

/// Everything that can stop a single report from being processed.
///
/// Missing or oddly-typed fields inside a report are never errors; they
/// fall back to defaults in [`crate::document`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Unknown export format '{0}' (expected json or html)")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
