//! The flexible single-date grammar.
//!
//! Accepts ISO dates, slash/dash/dot-separated numeric forms, textual
//! months in either order, and partial forms that borrow missing fields
//! from the current date. Purely numeric day/month pairs are ambiguous;
//! the resolution is day-first, retrying month-first only when the
//! day-first reading is calendrically invalid — two short-circuiting
//! attempts, never more.

use chrono::{Datelike, NaiveDate};
use exn::OptionExt;

use crate::error::{ErrorKind, Result};

/// Parses one date expression against `today` (for borrowed fields).
pub fn date(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    tokenize(raw)
        .as_deref()
        .and_then(|tokens| interpret(tokens, today))
        .ok_or_raise(|| ErrorKind::Unparseable { token: raw.to_string() })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// A numeric component; the digit count distinguishes `25` from `2025`.
    Number { value: u32, digits: usize },
    /// A textual month, already mapped to `1..=12`.
    Month(u32),
}

use Token::{Month, Number};

fn interpret(tokens: &[Token], today: NaiveDate) -> Option<NaiveDate> {
    match *tokens {
        // ISO order is unambiguous: a leading four-digit component is a year.
        [Number { value: year, digits: 4 }, Number { value: month, .. }, Number { value: day, .. }] => {
            NaiveDate::from_ymd_opt(year as i32, month, day)
        },
        [Number { value: a, .. }, Number { value: b, .. }, Number { value: year, digits }] => {
            day_month(a, b, expand_year(year, digits))
        },
        // Partial forms borrow the missing fields from today.
        [Number { value: a, .. }, Number { value: b, .. }] => day_month(a, b, today.year()),
        [Number { value: day, .. }] => today.with_day(day),
        [Number { value: day, .. }, Month(month)] | [Month(month), Number { value: day, .. }] => {
            NaiveDate::from_ymd_opt(today.year(), month, day)
        },
        [Number { value: day, .. }, Month(month), Number { value: year, digits }]
        | [Month(month), Number { value: day, .. }, Number { value: year, digits }] => {
            NaiveDate::from_ymd_opt(expand_year(year, digits), month, day)
        },
        _ => None,
    }
}

/// The ambiguous numeric pair: day-first, then month-first, then give up.
fn day_month(a: u32, b: u32, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, b, a).or_else(|| NaiveDate::from_ymd_opt(year, a, b))
}

/// Two-digit years pivot at 68: `00..=68` land in the 2000s, `69..=99` in
/// the 1900s.
fn expand_year(value: u32, digits: usize) -> i32 {
    if digits > 2 {
        value as i32
    } else if value <= 68 {
        2000 + value as i32
    } else {
        1900 + value as i32
    }
}

/// Splits an expression into numeric and month-name tokens.
///
/// Returns `None` as soon as any word is neither, so unrecognized input
/// fails loudly instead of guessing. Ordinal suffixes (`1st`, `22nd`) and
/// the filler words `of`/`the` are tolerated.
fn tokenize(raw: &str) -> Option<Vec<Token>> {
    let lowered = raw.to_lowercase();
    let mut tokens = Vec::new();
    for word in lowered.split([' ', '/', '-', '.', ',']).filter(|w| !w.is_empty()) {
        if matches!(word, "of" | "the") {
            continue;
        }
        if let Some(month) = month_number(word) {
            tokens.push(Month(month));
            continue;
        }
        let digits = strip_ordinal(word);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        tokens.push(Number { value: digits.parse().ok()?, digits: digits.len() });
    }
    Some(tokens)
}

/// Drops a trailing ordinal suffix from a day number.
fn strip_ordinal(word: &str) -> &str {
    if !word.starts_with(|c: char| c.is_ascii_digit()) {
        return word;
    }
    ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| word.strip_suffix(suffix))
        .unwrap_or(word)
}

fn month_number(word: &str) -> Option<u32> {
    Some(match word {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    })
}
