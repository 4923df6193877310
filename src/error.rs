//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Each kind marks the pipeline stage
//! a target died in; the stages themselves carry the detail.

use std::path::PathBuf;

use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The requested dates could not be resolved.
    #[display("failed to resolve the requested dates")]
    Dates,
    /// The HTTP client could not be constructed.
    #[display("failed to construct the HTTP client")]
    Client,
    /// The puzzle page could not be downloaded.
    #[display("failed to fetch {url}")]
    Fetch { url: String },
    /// The page downloaded but yielded no usable puzzle.
    #[display("failed to extract a puzzle from the page")]
    Extract,
    /// The puzzle could not be encoded into the container format.
    #[display("failed to encode the puzzle")]
    Encode,
    /// The destination directory could not be created.
    #[display("failed to create output directory {}", _0.display())]
    OutputDir(#[error(not(source))] PathBuf),
    /// The encoded file could not be written.
    #[display("failed to write {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Only the network can transiently fail; retrying is left to the
        // user (rerunning is idempotent).
        matches!(self, ErrorKind::Fetch { .. })
    }
}
