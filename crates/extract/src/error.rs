//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No script on the page carries the embedded application state.
    #[display("no embedded crossword state found in the page")]
    StateNotFound,
    /// The embedded state exists but could not be unescaped or deserialized.
    #[display("malformed embedded crossword state")]
    MalformedState,
    /// The state deserialized but holds no crossword object.
    #[display("embedded state carries no crossword")]
    MissingCrossword,
    /// The page echoed a different date than the one requested.
    #[display("requested puzzle for {expected}, page carries {found:?}")]
    WrongDate { expected: String, found: String },
    /// The page echoed a different crossword type than the one requested.
    #[display("requested a {expected} puzzle, page carries {found:?}")]
    WrongKind { expected: String, found: String },
    /// The payload's grid cannot form a rectangular puzzle.
    #[display("unusable grid in crossword payload: {reason}")]
    InvalidGrid { reason: &'static str },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The page either carries a usable crossword or it does not.
        false
    }
}
