//! Escaping between runtime string content and PO quoted-literal text.
//!
//! [`escape`] and [`unescape`] are exact inverses over everything the literal
//! grammar admits: the named escapes `\n \t \r \b \f \" \' \\` plus `\uXXXX`
//! for code points outside printable ASCII (astral code points become a
//! UTF-16 surrogate pair, two `\u` sequences).

use std::fmt::Write;

use crate::error::Error;

/// Escapes a runtime string into PO literal content.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut units = [0u16; 2];
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            ' '..='~' => out.push(ch),
            _ => {
                for unit in ch.encode_utf16(&mut units) {
                    // String formatting never fails
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
    }
    out
}

/// Unescapes PO literal content back into a runtime string.
///
/// Returns [`Error::MalformedLiteral`] on an unknown escape, a truncated
/// `\u` sequence, or an unpaired surrogate.
pub fn unescape(literal: &str) -> Result<String, Error> {
    let malformed = || Error::MalformedLiteral(literal.to_string());
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let unit = read_hex4(&mut chars).ok_or_else(malformed)?;
                if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate: the low half must follow immediately.
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(malformed());
                    }
                    let low = read_hex4(&mut chars).ok_or_else(malformed)?;
                    match char::decode_utf16([unit, low]).next() {
                        Some(Ok(decoded)) => out.push(decoded),
                        _ => return Err(malformed()),
                    }
                } else {
                    match char::decode_utf16([unit]).next() {
                        Some(Ok(decoded)) => out.push(decoded),
                        _ => return Err(malformed()),
                    }
                }
            }
            _ => return Err(malformed()),
        }
    }
    Ok(out)
}

fn read_hex4(chars: &mut impl Iterator<Item = char>) -> Option<u16> {
    let mut value: u16 = 0;
    for _ in 0..4 {
        let digit = chars.next()?.to_digit(16)?;
        value = (value << 4) | digit as u16;
    }
    Some(value)
}
