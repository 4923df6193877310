//! Flexible date and date-range resolution.
//!
//! Turns a user-supplied token — a single date expression, or two joined by
//! `:` — into an unambiguous [`DateRange`]:
//!
//! - **Grammar**: ISO dates, slash/dash/dot numerics with 2- or 4-digit
//!   years, textual months in either order, and partial forms that borrow
//!   missing fields from the current date.
//! - **Disambiguation**: purely numeric pairs read day-first, retrying
//!   month-first only when day-first is calendrically invalid.
//! - **Timezone**: "today" is the wall clock converted into a fixed IANA
//!   zone ([`DEFAULT_ZONE`], the source paper's home zone), never the
//!   machine-local zone. The current instant is an explicit argument so
//!   callers and tests control it deterministically.
//!
//! Everything is pure and synchronous; the resolver returns the boundary
//! pair and leaves day-by-day enumeration to [`DateRange::days`].

pub mod error;
mod parse;
mod range;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::instrument;

use crate::error::Result;
pub use crate::range::DateRange;

/// The zone "today" is computed in when no date is given: the crosswords
/// are published on Sydney time.
pub const DEFAULT_ZONE: Tz = chrono_tz::Australia::Sydney;

/// Resolves an optional date token into an inclusive range.
///
/// `None` (or a blank token) resolves to today in `zone`; a lone
/// expression to a single-day range; `start:end` to an explicit range.
/// The first `:` is the separator — date expressions themselves never
/// contain one.
///
/// # Errors
/// [`error::ErrorKind::Unparseable`] when either side matches no
/// recognized grammar; [`error::ErrorKind::InvertedRange`] when an
/// explicit range runs backwards.
#[instrument(skip(now))]
pub fn resolve(token: Option<&str>, zone: Tz, now: DateTime<Utc>) -> Result<DateRange> {
    let today = today_in(zone, now);
    let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) else {
        return Ok(DateRange::single(today));
    };
    match token.split_once(':') {
        Some((start, end)) => {
            let start = parse::date(start.trim(), today)?;
            let end = parse::date(end.trim(), today)?;
            DateRange::new(start, end)
        },
        None => Ok(DateRange::single(parse::date(token, today)?)),
    }
}

/// The calendar date of `instant` as observed in `zone`.
pub fn today_in(zone: Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&zone).date_naive()
}
