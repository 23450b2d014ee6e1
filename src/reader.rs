//! The streaming read path: header accumulation plus the entry state machine
//! that assembles one [`Message`] at a time.
//!
//! Parsing is lazy and forward-only. [`MessageReader`] yields messages on
//! demand; the first failure is surfaced once and permanently ends the
//! sequence. The cursor (and with it the underlying stream) is released when
//! the reader is dropped, whether the consumer drained it or abandoned it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;
use crate::escape::unescape;
use crate::lines::{LineCursor, LineKind, classify};
use crate::types::{Message, MessageHeader, MultipartString};

lazy_static! {
    static ref PLURAL_KEY_RE: Regex = Regex::new(r"^msgstr\[(\d+)\]$").unwrap();
}

/// Starts parsing a PO catalog from any buffered reader.
pub fn parse_reader<R: BufRead>(reader: R) -> MessageReader<R> {
    MessageReader {
        cursor: LineCursor::new(reader),
        done: false,
    }
}

/// Starts parsing a PO catalog file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<MessageReader<BufReader<File>>, Error> {
    let file = File::open(path).map_err(Error::Io)?;
    Ok(parse_reader(BufReader::new(file)))
}

/// Lazy, single-pass iterator over the messages of one catalog.
pub struct MessageReader<R: BufRead> {
    cursor: LineCursor<R>,
    done: bool,
}

impl<R: BufRead> MessageReader<R> {
    fn next_message(&mut self) -> Result<Option<Message>, Error> {
        if self.cursor.peek()?.is_none() {
            return Ok(None);
        }
        let header = read_header(&mut self.cursor)?;
        read_message(&mut self.cursor, header).map(Some)
    }
}

impl<R: BufRead> Iterator for MessageReader<R> {
    type Item = Result<Message, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_message() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}

/// Accumulates the comment/location/flag block preceding an entry.
///
/// Stops without consuming at the first line that is not header-shaped.
fn read_header<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<MessageHeader, Error> {
    let mut header = MessageHeader::default();
    while let Some(line) = cursor.peek()? {
        match classify(line) {
            LineKind::TranslatorComment(text) => {
                cursor.advance()?;
                header.translator_comments.push(text);
            }
            LineKind::ExtractedComment(text) => {
                cursor.advance()?;
                header.extracted_comments.push(text);
            }
            LineKind::Location(location) => {
                cursor.advance()?;
                header.locations.push(location);
            }
            LineKind::Flags(raw) => {
                cursor.advance()?;
                for token in raw.split(',') {
                    let token = token.trim();
                    if token.is_empty() {
                        continue;
                    }
                    header.flags.insert(token.parse()?);
                }
            }
            LineKind::OtherComment => {
                cursor.advance()?;
            }
            LineKind::MalformedComment => {
                return Err(Error::MalformedHeaderLine(line.to_string()));
            }
            _ => break,
        }
    }
    Ok(header)
}

/// Reads one keyed entry and its run of continuation literals.
fn read_entry<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<(String, MultipartString), Error> {
    let line = cursor.advance()?.ok_or(Error::PrematureEndOfStream)?;
    let (key, literal) = match classify(&line) {
        LineKind::Entry { key, literal } => (key, literal),
        LineKind::Unrecognized if line.contains('"') => {
            return Err(Error::MalformedLiteral(line));
        }
        _ => {
            return Err(Error::UnexpectedEntryKey {
                found: line,
                expected: "a keyed entry",
            });
        }
    };
    let mut value = MultipartString::new(vec![unescape(&literal)?]);
    while let Some(next) = cursor.peek()? {
        match classify(next) {
            LineKind::Continuation(part) => {
                cursor.advance()?;
                value.push_part(unescape(&part)?);
            }
            _ => break,
        }
    }
    Ok((key, value))
}

/// Peeks the key of the next entry, if the next line is a keyed entry.
fn peek_entry_key<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<Option<String>, Error> {
    match cursor.peek()? {
        Some(line) => match classify(line) {
            LineKind::Entry { key, .. } => Ok(Some(key)),
            _ => Ok(None),
        },
        None => Ok(None),
    }
}

/// Assembles one message: `[msgctxt] msgid (msgstr | msgid_plural msgstr[i]*)`.
fn read_message<R: BufRead>(
    cursor: &mut LineCursor<R>,
    header: MessageHeader,
) -> Result<Message, Error> {
    let (first_key, first_value) = read_entry(cursor)?;
    let (context, id) = match first_key.as_str() {
        "msgctxt" => {
            let (key, id) = read_entry(cursor)?;
            if key != "msgid" {
                return Err(Error::UnexpectedEntryKey {
                    found: key,
                    expected: "msgid",
                });
            }
            (Some(first_value), id)
        }
        "msgid" => (None, first_value),
        _ => {
            return Err(Error::UnexpectedEntryKey {
                found: first_key,
                expected: "msgctxt or msgid",
            });
        }
    };

    match peek_entry_key(cursor)? {
        Some(key) if key == "msgstr" => {
            let (_, translation) = read_entry(cursor)?;
            Ok(Message::Singular {
                header,
                context,
                id,
                translation,
            })
        }
        Some(key) if key == "msgid_plural" => {
            let (_, plural_id) = read_entry(cursor)?;
            let translations = read_plural_translations(cursor)?;
            Ok(Message::Plural {
                header,
                context,
                id,
                plural_id,
                translations,
            })
        }
        _ => {
            let found = match cursor.peek()? {
                Some(line) => format!("`{line}`"),
                None => "end of stream".to_string(),
            };
            Err(Error::MissingTranslationEntry(found))
        }
    }
}

/// Collects `msgstr[i]` entries for contiguous indices starting at 0.
///
/// A higher index than expected is a gap: collection stops there without
/// error. A lower index recurring is out of order and fails.
fn read_plural_translations<R: BufRead>(
    cursor: &mut LineCursor<R>,
) -> Result<Vec<MultipartString>, Error> {
    let mut translations: Vec<MultipartString> = Vec::new();
    loop {
        let expected = translations.len();
        let index = match peek_entry_key(cursor)? {
            Some(key) => PLURAL_KEY_RE
                .captures(&key)
                .and_then(|caps| caps[1].parse::<usize>().ok()),
            None => None,
        };
        match index {
            Some(found) if found == expected => {
                let (_, translation) = read_entry(cursor)?;
                translations.push(translation);
            }
            Some(found) if found < expected => {
                return Err(Error::OutOfOrderPluralIndex { found, expected });
            }
            _ => break,
        }
    }
    Ok(translations)
}
