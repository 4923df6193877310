//! Latin-1 sanitization of scraped text.
//!
//! The container format stores text as Latin-1, while the source site
//! serves UTF-8 sprinkled with markup, HTML entities, smart punctuation,
//! and the occasional emoji. Everything user-visible passes through here:
//! markup is stripped, entities decoded, and the remainder transliterated
//! to ASCII, which is trivially Latin-1-safe.

use deunicode::deunicode;
use tracing::debug;

use crate::consts;

/// Sanitizes one text field, logging when the text had to change.
///
/// `context` names the field for the log event (the file itself records
/// nothing; a solver only ever sees the sanitized form).
pub fn sanitize(text: &str, context: &str) -> String {
    let stripped = consts::TAG_REGEX.replace_all(text, " ");
    let decoded = decode_entities(&stripped);
    let sanitized = collapse_whitespace(deunicode(&decoded).trim());
    if sanitized != text {
        debug!(%context, original = %text, %sanitized, "sanitized text for Latin-1 output");
    }
    sanitized
}

/// Decodes the named entities the source actually emits, plus numeric
/// character references.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest
            .find(';')
            .filter(|end| *end <= 9)
            .and_then(|end| decode_entity(&rest[1..end]).map(|entity| (entity, end)));
        match decoded {
            Some((entity, end)) => {
                out.push_str(&entity);
                rest = &rest[end + 1..];
            },
            // Not an entity; keep the ampersand and move on.
            None => {
                out.push('&');
                rest = &rest[1..];
            },
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<String> {
    let named = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "hellip" => "\u{2026}",
        _ => {
            let value = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            return char::from_u32(value).map(String::from);
        },
    };
    Some(named.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.chars() {
        if c.is_whitespace() {
            in_gap = true;
            continue;
        }
        if in_gap && !out.is_empty() {
            out.push(' ');
        }
        in_gap = false;
        out.push(c);
    }
    out
}
