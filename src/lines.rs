//! Line-level access to PO catalog text.
//!
//! [`LineCursor`] wraps a buffered reader and hands out trimmed, non-empty
//! lines with exactly one line of lookahead. [`classify`] maps one such line
//! to its structural category; everything above this module works on
//! categories, never on raw text.

use std::io::BufRead;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;
use crate::types::MessageLocation;

/// Prefix of the reserved comment line the writer emits first. A line
/// starting with it is skipped on read so written output re-parses cleanly.
pub(crate) const GENERATED_PREFIX: &str = "#  !Generated:";

// A quoted literal admits runs of non-quote/non-backslash characters and the
// recognized escape sequences only. Anything else fails the grammar.
const LITERAL_BODY: &str = r#"((?:[^"\\]|\\[ntrbf"'\\]|\\u[0-9a-fA-F]{4})*)"#;

lazy_static! {
    static ref LOCATION_RE: Regex = Regex::new(r"^#:\s*(.+):(\d+)\s*$").unwrap();
    static ref ENTRY_RE: Regex = Regex::new(&format!(
        r#"^([A-Za-z_][A-Za-z0-9_]*(?:\[\d+\])?)\s+"{}"$"#,
        LITERAL_BODY
    ))
    .unwrap();
    static ref CONTINUATION_RE: Regex =
        Regex::new(&format!(r#"^"{}"$"#, LITERAL_BODY)).unwrap();
}

/// Structural category of one trimmed, non-empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// `# text` — translator comment.
    TranslatorComment(String),
    /// `#. text` — comment extracted from source code.
    ExtractedComment(String),
    /// `#: path:line` — source reference.
    Location(MessageLocation),
    /// `#, a, b` — raw flag list, not yet split or validated.
    Flags(String),
    /// Any other `#...` comment; consumed but never retained.
    OtherComment,
    /// A `#:` line whose payload is not `path:line`.
    MalformedComment,
    /// `key "literal"` — keyed entry; literal content still escaped.
    Entry { key: String, literal: String },
    /// Bare `"literal"` — continuation of the previous entry's value.
    Continuation(String),
    /// None of the above.
    Unrecognized,
}

/// Classifies one line. Most-specific comment prefix wins; entry and
/// continuation literals must satisfy the escape grammar in full.
pub(crate) fn classify(line: &str) -> LineKind {
    if line.starts_with("#:") {
        return match LOCATION_RE.captures(line) {
            Some(caps) => match caps[2].parse::<u32>() {
                Ok(number) => LineKind::Location(MessageLocation {
                    file: caps[1].trim().to_string(),
                    line: number,
                }),
                Err(_) => LineKind::MalformedComment,
            },
            None => LineKind::MalformedComment,
        };
    }
    if let Some(rest) = line.strip_prefix("#.") {
        return LineKind::ExtractedComment(rest.trim().to_string());
    }
    if let Some(rest) = line.strip_prefix("#,") {
        return LineKind::Flags(rest.to_string());
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return LineKind::TranslatorComment(rest.trim().to_string());
    }
    if line.starts_with('#') {
        return LineKind::OtherComment;
    }
    if let Some(caps) = ENTRY_RE.captures(line) {
        return LineKind::Entry {
            key: caps[1].to_string(),
            literal: caps[2].to_string(),
        };
    }
    if let Some(caps) = CONTINUATION_RE.captures(line) {
        return LineKind::Continuation(caps[1].to_string());
    }
    LineKind::Unrecognized
}

/// A peekable cursor over the significant lines of a PO stream.
///
/// Owns the underlying reader, so dropping the cursor releases the stream on
/// every exit path: exhaustion, error, or early abandonment by the consumer.
pub struct LineCursor<R: BufRead> {
    lines: std::io::Lines<R>,
    peeked: Option<String>,
    generated_skipped: bool,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        LineCursor {
            lines: reader.lines(),
            peeked: None,
            generated_skipped: false,
        }
    }

    /// Returns the next significant line without consuming it.
    pub fn peek(&mut self) -> Result<Option<&str>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.next_significant()?;
        }
        Ok(self.peeked.as_deref())
    }

    /// Returns and consumes the next significant line.
    pub fn advance(&mut self) -> Result<Option<String>, Error> {
        if let Some(line) = self.peeked.take() {
            return Ok(Some(line));
        }
        self.next_significant()
    }

    fn next_significant(&mut self) -> Result<Option<String>, Error> {
        while let Some(line) = self.lines.next().transpose()? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !self.generated_skipped && trimmed.starts_with(GENERATED_PREFIX) {
                self.generated_skipped = true;
                continue;
            }
            return Ok(Some(trimmed.to_string()));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor(text: &str) -> LineCursor<Cursor<&str>> {
        LineCursor::new(Cursor::new(text))
    }

    #[test]
    fn test_classify_translator_comment() {
        assert_eq!(
            classify("# a note"),
            LineKind::TranslatorComment("a note".to_string())
        );
    }

    #[test]
    fn test_classify_extracted_comment() {
        assert_eq!(
            classify("#. from source"),
            LineKind::ExtractedComment("from source".to_string())
        );
    }

    #[test]
    fn test_classify_location() {
        assert_eq!(
            classify("#: src/main.rs:42"),
            LineKind::Location(MessageLocation {
                file: "src/main.rs".to_string(),
                line: 42,
            })
        );
    }

    #[test]
    fn test_classify_location_keeps_last_colon_as_separator() {
        assert_eq!(
            classify("#: C:/app/main.c:7"),
            LineKind::Location(MessageLocation {
                file: "C:/app/main.c".to_string(),
                line: 7,
            })
        );
    }

    #[test]
    fn test_classify_malformed_location() {
        assert_eq!(classify("#: nonsense"), LineKind::MalformedComment);
        assert_eq!(classify("#: file.c:abc"), LineKind::MalformedComment);
    }

    #[test]
    fn test_classify_flags() {
        assert_eq!(
            classify("#, fuzzy, c-format"),
            LineKind::Flags(" fuzzy, c-format".to_string())
        );
    }

    #[test]
    fn test_classify_other_comment() {
        assert_eq!(classify("#~ obsolete"), LineKind::OtherComment);
        assert_eq!(classify("#"), LineKind::OtherComment);
        assert_eq!(classify("#no-space"), LineKind::OtherComment);
    }

    #[test]
    fn test_classify_entry() {
        assert_eq!(
            classify(r#"msgid "Hello""#),
            LineKind::Entry {
                key: "msgid".to_string(),
                literal: "Hello".to_string(),
            }
        );
        assert_eq!(
            classify(r#"msgstr[1] "%d fichiers""#),
            LineKind::Entry {
                key: "msgstr[1]".to_string(),
                literal: "%d fichiers".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_entry_with_escapes() {
        assert_eq!(
            classify(r#"msgid "a\nb \"c\" \u00e9""#),
            LineKind::Entry {
                key: "msgid".to_string(),
                literal: r#"a\nb \"c\" \u00e9"#.to_string(),
            }
        );
    }

    #[test]
    fn test_classify_continuation() {
        assert_eq!(
            classify(r#""World""#),
            LineKind::Continuation("World".to_string())
        );
        assert_eq!(classify(r#""""#), LineKind::Continuation(String::new()));
    }

    #[test]
    fn test_classify_rejects_malformed_literals() {
        // Unterminated quote and unknown escape both fail the literal grammar.
        assert_eq!(classify(r#"msgid "oops"#), LineKind::Unrecognized);
        assert_eq!(classify(r#"msgid "bad \q""#), LineKind::Unrecognized);
        assert_eq!(classify(r#""bad \u12g4""#), LineKind::Unrecognized);
        assert_eq!(classify("stray text"), LineKind::Unrecognized);
    }

    #[test]
    fn test_cursor_skips_blank_lines_and_trims() {
        let mut lines = cursor("\n  \nmsgid \"a\"\n\n  msgstr \"b\"  \n");
        assert_eq!(lines.advance().unwrap().as_deref(), Some("msgid \"a\""));
        assert_eq!(lines.advance().unwrap().as_deref(), Some("msgstr \"b\""));
        assert_eq!(lines.advance().unwrap(), None);
    }

    #[test]
    fn test_cursor_peek_does_not_consume() {
        let mut lines = cursor("msgid \"a\"\n");
        assert_eq!(lines.peek().unwrap(), Some("msgid \"a\""));
        assert_eq!(lines.peek().unwrap(), Some("msgid \"a\""));
        assert_eq!(lines.advance().unwrap().as_deref(), Some("msgid \"a\""));
        assert_eq!(lines.peek().unwrap(), None);
        assert_eq!(lines.advance().unwrap(), None);
    }

    #[test]
    fn test_cursor_skips_generated_header_once() {
        let text = "#  !Generated: pocodec 0\n\nmsgid \"a\"\nmsgstr \"b\"\n";
        let mut lines = cursor(text);
        assert_eq!(lines.peek().unwrap(), Some("msgid \"a\""));
    }
}
