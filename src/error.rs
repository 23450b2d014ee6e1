//! All error types for the pocodec crate.
//!
//! Parsing is fail-fast: the first malformed line terminates the message
//! sequence with one of these, carrying the offending text so callers can
//! diagnose the catalog.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("premature end of stream: an entry line was expected")]
    PrematureEndOfStream,

    #[error("malformed header line: `{0}`")]
    MalformedHeaderLine(String),

    #[error("undefined flag `{0}`")]
    UndefinedFlag(String),

    #[error("unexpected entry key `{found}`, expected {expected}")]
    UnexpectedEntryKey { found: String, expected: &'static str },

    #[error("out-of-order plural index {found}, expected {expected}")]
    OutOfOrderPluralIndex { found: usize, expected: usize },

    #[error("missing msgstr or msgid_plural after msgid: found {0}")]
    MissingTranslationEntry(String),

    #[error("malformed literal: `{0}`")]
    MalformedLiteral(String),

    #[error("cache error: {0}")]
    Cache(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
