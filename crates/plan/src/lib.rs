//! Download target planning.
//!
//! Combines the requested crossword types with a resolved [`DateRange`]
//! into the ordered work list handed to the fetcher: one
//! [`DownloadTarget`] per (type, date) pair, each with its destination
//! path decided up front. Planning is pure — no I/O, no network — and
//! deterministic: types always iterate in their declared order, dates
//! ascending.

pub mod error;
mod planner;

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};
pub use crate::planner::{DownloadTarget, plan};
pub use gridfetch_dates::DateRange;

/// The crossword types the source publishes.
///
/// The declared order is the iteration order everywhere targets are
/// emitted, so plans never depend on how the caller collected the set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrosswordType {
    Cryptic,
    Mini,
    Quick,
}

impl CrosswordType {
    pub const ALL: [CrosswordType; 3] =
        [CrosswordType::Cryptic, CrosswordType::Mini, CrosswordType::Quick];

    /// The lowercase name used in URLs, directory names, and filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrosswordType::Cryptic => "cryptic",
            CrosswordType::Mini => "mini",
            CrosswordType::Quick => "quick",
        }
    }
}

impl FromStr for CrosswordType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cryptic" => Ok(CrosswordType::Cryptic),
            "mini" => Ok(CrosswordType::Mini),
            "quick" => Ok(CrosswordType::Quick),
            _ => exn::bail!(ErrorKind::UnknownType(s.to_string())),
        }
    }
}

impl Display for CrosswordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(feature = "cli")]
impl clap::ValueEnum for CrosswordType {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}
