//! Canonical serialization of messages back to PO text, the inverse of the
//! read path.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Error;
use crate::escape::escape;
use crate::lines::GENERATED_PREFIX;
use crate::types::{Message, MessageHeader, MultipartString};

/// Serializes messages to any writer.
///
/// Emits the reserved generated-header line first, then each message in
/// sequence order, blank-line separated. Messages are assumed well-formed;
/// no semantic validation happens here.
pub fn to_writer<'a, W, I>(mut writer: W, messages: I) -> Result<(), Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Message>,
{
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    writeln!(writer, "{} pocodec {}", GENERATED_PREFIX, stamp)?;
    writeln!(writer)?;

    let mut first = true;
    for message in messages {
        if !first {
            writeln!(writer)?;
        }
        first = false;
        write_message(&mut writer, message)?;
    }
    writer.flush()?;
    Ok(())
}

/// Serializes messages to a file, overwriting it.
pub fn write_to<'a, P, I>(path: P, messages: I) -> Result<(), Error>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Message>,
{
    let file = File::create(path).map_err(Error::Io)?;
    to_writer(BufWriter::new(file), messages)
}

fn write_message<W: Write>(writer: &mut W, message: &Message) -> Result<(), Error> {
    write_header(writer, message.header())?;
    if let Some(context) = message.context() {
        write_value(writer, "msgctxt", context)?;
    }
    match message {
        Message::Singular {
            id, translation, ..
        } => {
            write_value(writer, "msgid", id)?;
            write_value(writer, "msgstr", translation)?;
        }
        Message::Plural {
            id,
            plural_id,
            translations,
            ..
        } => {
            write_value(writer, "msgid", id)?;
            write_value(writer, "msgid_plural", plural_id)?;
            for (index, translation) in translations.iter().enumerate() {
                write_value(writer, &format!("msgstr[{}]", index), translation)?;
            }
        }
    }
    Ok(())
}

fn write_header<W: Write>(writer: &mut W, header: &MessageHeader) -> Result<(), Error> {
    for comment in &header.translator_comments {
        writeln!(writer, "#  {}", comment)?;
    }
    for comment in &header.extracted_comments {
        writeln!(writer, "#. {}", comment)?;
    }
    for location in &header.locations {
        writeln!(writer, "#: {}:{}", location.file, location.line)?;
    }
    if !header.flags.is_empty() {
        let joined = header
            .flags
            .iter()
            .map(|flag| flag.name())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(writer, "#, {}", joined)?;
    }
    Ok(())
}

/// One keyed line, then one bare literal line per remaining part. A value
/// with no parts is written as a single empty literal.
fn write_value<W: Write>(writer: &mut W, key: &str, value: &MultipartString) -> Result<(), Error> {
    if value.parts.is_empty() {
        writeln!(writer, "{} \"\"", key)?;
        return Ok(());
    }
    let mut parts = value.parts.iter();
    if let Some(head) = parts.next() {
        writeln!(writer, "{} \"{}\"", key, escape(head))?;
    }
    for part in parts {
        writeln!(writer, "\"{}\"", escape(part))?;
    }
    Ok(())
}
