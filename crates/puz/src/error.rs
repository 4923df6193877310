//! Container Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A container encoding error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for container operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Every kind is terminal for the single puzzle it concerns; a batch caller
/// reports it and moves on to the next target.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Solution and player grids differ in size or block pattern.
    #[display("solution and player grids do not describe the same puzzle")]
    DimensionMismatch,
    /// The supplied clue count differs from the numbered entries the grid implies.
    #[display("grid implies {expected} clues, found {found}")]
    ClueCountMismatch { expected: usize, found: usize },
    /// A text field exceeds the container's per-field ceiling.
    #[display("field too large for the container: {field} ({len} bytes)")]
    OversizedField { field: String, len: usize },
    /// A field holds content the container cannot represent
    /// (embedded NUL, non-Latin-1 text, or an impossible cell state).
    #[display("field cannot be represented in the container: {field}")]
    InvalidFieldContent { field: String },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The model is either encodable or it is not.
        false
    }
}
