//! Locating and decoding the embedded crossword state.
//!
//! The source site is a client-rendered page; the crossword never appears
//! in the markup itself. Instead one of the page's scripts assigns the
//! application state as `window.INITIAL_STATE = JSON.parse("…")`, a JSON
//! document wrapped in a JavaScript string literal. Extraction walks the
//! script elements, captures that literal, unescapes it, and deserializes
//! the crossword payload out of the state tree.

use exn::{OptionExt, ResultExt};
use scraper::Html;
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::payload::{CrosswordPayload, InitialState};

/// Pulls the crossword payload out of a fetched puzzle page.
#[instrument(skip(html), fields(html_size = html.as_ref().len()))]
pub fn extract(html: impl AsRef<str>) -> Result<CrosswordPayload> {
    let document = Html::parse_document(html.as_ref());
    for script in document.select(&consts::SCRIPT_SELECTOR) {
        let text: String = script.text().collect();
        let Some(literal) = consts::STATE_REGEX.captures(&text).and_then(|c| c.get(1)) else {
            continue;
        };
        let json = unescape_js(literal.as_str())?;
        let state: InitialState =
            serde_json::from_str(&json).or_raise(|| ErrorKind::MalformedState)?;
        return state
            .crosswords
            .and_then(|crosswords| crosswords.crossword)
            .ok_or_raise(|| ErrorKind::MissingCrossword);
    }
    exn::bail!(ErrorKind::StateNotFound)
}

/// Decodes a JavaScript string literal's escape sequences.
///
/// Handles the simple escapes, `\xNN`, and `\uNNNN` including surrogate
/// pairs; any other escaped character decodes to itself (which covers
/// `\"`, `\\`, and `\/`).
fn unescape_js(literal: &str) -> Result<String> {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = chars.next().ok_or_raise(|| ErrorKind::MalformedState)?;
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' => out.push('\0'),
            'x' => {
                let value = hex_value(&mut chars, 2)?;
                out.push(char::from_u32(value).ok_or_raise(|| ErrorKind::MalformedState)?);
            },
            'u' => {
                let value = match hex_value(&mut chars, 4)? {
                    // High surrogate: the low half must follow immediately.
                    high @ 0xD800..=0xDBFF => {
                        if chars.next() != Some('\\') || chars.next() != Some('u') {
                            exn::bail!(ErrorKind::MalformedState);
                        }
                        let low = hex_value(&mut chars, 4)?;
                        if !(0xDC00..=0xDFFF).contains(&low) {
                            exn::bail!(ErrorKind::MalformedState);
                        }
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                    },
                    value => value,
                };
                out.push(char::from_u32(value).ok_or_raise(|| ErrorKind::MalformedState)?);
            },
            other => out.push(other),
        }
    }
    Ok(out)
}

fn hex_value(chars: &mut std::str::Chars<'_>, len: usize) -> Result<u32> {
    let mut value = 0;
    for _ in 0..len {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_raise(|| ErrorKind::MalformedState)?;
        value = value * 16 + digit;
    }
    Ok(value)
}
