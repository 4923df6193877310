use chrono::NaiveDate;

use crate::error::{ErrorKind, Result};

/// An inclusive, immutable span of calendar dates.
///
/// A single date is the degenerate range `start == end`, so a range always
/// spans at least one day. Enumeration is deliberately separate from
/// resolution: [`days`](DateRange::days) is a lazy, restartable iterator, so
/// a very large range costs nothing until walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `end < start` with
    /// [`ErrorKind::InvertedRange`].
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            exn::bail!(ErrorKind::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The degenerate single-day range.
    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days the range spans, both ends inclusive.
    pub fn num_days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    /// Ascending day-by-day walk from start to end, both inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }
}

impl From<NaiveDate> for DateRange {
    fn from(date: NaiveDate) -> Self {
        Self::single(date)
    }
}
