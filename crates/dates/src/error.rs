//! Date Resolution Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use chrono::NaiveDate;
use derive_more::{Display, Error};

/// A date resolution error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for date resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The expression matched no recognized date grammar under either
    /// numeric component ordering.
    #[display("unrecognized date expression: {token:?}")]
    Unparseable { token: String },
    /// An explicit range ran backwards.
    #[display("end date {end} is before start date {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The token is either a date or it is not.
        false
    }
}
