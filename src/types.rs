//! Core data model for PO catalogs.
//! The reader decodes into these; the writer serializes them back.

use std::{
    collections::BTreeSet,
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, traits::Parser};

impl Parser for Vec<Message> {
    /// Parse a JSON cache of messages from any reader.
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Cache)
    }

    /// Write a JSON cache of messages to any writer (file, memory, etc.).
    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer(&mut writer, self).map_err(Error::Cache)
    }
}

/// A logical string value split across one or more quoted literal lines.
///
/// PO allows a value to continue over several `"..."` lines; the part
/// boundaries are significant and preserved exactly so a catalog round-trips
/// byte-for-byte. An empty part list is the empty value, written as one `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MultipartString {
    /// The literal fragments, in file order, already unescaped.
    pub parts: Vec<String>,
}

impl MultipartString {
    pub fn new(parts: Vec<String>) -> Self {
        MultipartString { parts }
    }

    /// The full value: all parts concatenated.
    pub fn text(&self) -> String {
        self.parts.concat()
    }

    /// True when the value concatenates to the empty string.
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| part.is_empty())
    }

    pub(crate) fn push_part(&mut self, part: String) {
        self.parts.push(part);
    }
}

impl From<&str> for MultipartString {
    fn from(value: &str) -> Self {
        MultipartString {
            parts: vec![value.to_string()],
        }
    }
}

impl From<Vec<String>> for MultipartString {
    fn from(parts: Vec<String>) -> Self {
        MultipartString { parts }
    }
}

impl Display for MultipartString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in &self.parts {
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// A source-code reference attached to a message (`#: file:line`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageLocation {
    /// Path of the source file the message was extracted from.
    pub file: String,
    /// 1-based line number within that file.
    pub line: u32,
}

impl Display for MessageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// The closed vocabulary of message flags (`#, ...` lines).
///
/// Tokens are recognized case-insensitively; [`Display`] gives the canonical
/// lowercase spelling the writer emits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MessageFlag {
    /// The translation needs review.
    Fuzzy,
    CFormat,
    NoCFormat,
    PythonFormat,
    NoPythonFormat,
    NoWrap,
}

impl MessageFlag {
    pub fn name(&self) -> &'static str {
        match self {
            MessageFlag::Fuzzy => "fuzzy",
            MessageFlag::CFormat => "c-format",
            MessageFlag::NoCFormat => "no-c-format",
            MessageFlag::PythonFormat => "python-format",
            MessageFlag::NoPythonFormat => "no-python-format",
            MessageFlag::NoWrap => "no-wrap",
        }
    }
}

impl FromStr for MessageFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fuzzy" => Ok(MessageFlag::Fuzzy),
            "c-format" => Ok(MessageFlag::CFormat),
            "no-c-format" => Ok(MessageFlag::NoCFormat),
            "python-format" => Ok(MessageFlag::PythonFormat),
            "no-python-format" => Ok(MessageFlag::NoPythonFormat),
            "no-wrap" => Ok(MessageFlag::NoWrap),
            other => Err(Error::UndefinedFlag(other.to_string())),
        }
    }
}

impl Display for MessageFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The comment/location/flag block preceding one message.
///
/// A header belongs to exactly one message; it is never shared. Comment and
/// location order is preserved; flags form a set with no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageHeader {
    /// Translator comments (`# ...`), in encounter order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub translator_comments: Vec<String>,

    /// Comments extracted from source code (`#. ...`), in encounter order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub extracted_comments: Vec<String>,

    /// Source references (`#: file:line`), in encounter order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub locations: Vec<MessageLocation>,

    /// Message flags (`#, a, b`). BTreeSet keeps the writer deterministic.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    #[serde(default)]
    pub flags: BTreeSet<MessageFlag>,
}

impl MessageHeader {
    pub fn is_empty(&self) -> bool {
        self.translator_comments.is_empty()
            && self.extracted_comments.is_empty()
            && self.locations.is_empty()
            && self.flags.is_empty()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.contains(&MessageFlag::Fuzzy)
    }
}

/// A single translatable message entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Message {
    /// A message without plural forms.
    Singular {
        header: MessageHeader,
        /// Disambiguating context (`msgctxt`), present only if the source had one.
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        context: Option<MultipartString>,
        /// The untranslated string (`msgid`).
        id: MultipartString,
        /// The translation (`msgstr`).
        translation: MultipartString,
    },

    /// A message with plural forms.
    Plural {
        header: MessageHeader,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        context: Option<MultipartString>,
        /// The untranslated singular string (`msgid`).
        id: MultipartString,
        /// The untranslated plural string (`msgid_plural`).
        plural_id: MultipartString,
        /// Per-form translations (`msgstr[i]`), index = plural-form index,
        /// contiguous from 0.
        translations: Vec<MultipartString>,
    },
}

impl Message {
    pub fn header(&self) -> &MessageHeader {
        match self {
            Message::Singular { header, .. } | Message::Plural { header, .. } => header,
        }
    }

    pub fn context(&self) -> Option<&MultipartString> {
        match self {
            Message::Singular { context, .. } | Message::Plural { context, .. } => {
                context.as_ref()
            }
        }
    }

    pub fn id(&self) -> &MultipartString {
        match self {
            Message::Singular { id, .. } | Message::Plural { id, .. } => id,
        }
    }

    pub fn is_plural(&self) -> bool {
        matches!(self, Message::Plural { .. })
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Message {{ id: {}, plural: {} }}",
            self.id(),
            self.is_plural()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_string_preserves_part_boundaries() {
        let value = MultipartString::from(vec!["Hello ".to_string(), "World".to_string()]);
        assert_eq!(value.parts.len(), 2);
        assert_eq!(value.text(), "Hello World");
        assert_eq!(value.to_string(), "Hello World");
    }

    #[test]
    fn test_multipart_string_emptiness() {
        assert!(MultipartString::default().is_empty());
        assert!(MultipartString::from("").is_empty());
        assert!(!MultipartString::from("x").is_empty());
    }

    #[test]
    fn test_message_location_display() {
        let location = MessageLocation {
            file: "src/main.rs".to_string(),
            line: 42,
        };
        assert_eq!(location.to_string(), "src/main.rs:42");
    }

    #[test]
    fn test_message_flag_from_str_case_insensitive() {
        assert_eq!("fuzzy".parse::<MessageFlag>().unwrap(), MessageFlag::Fuzzy);
        assert_eq!("Fuzzy".parse::<MessageFlag>().unwrap(), MessageFlag::Fuzzy);
        assert_eq!(
            " C-FORMAT ".parse::<MessageFlag>().unwrap(),
            MessageFlag::CFormat
        );
    }

    #[test]
    fn test_message_flag_from_str_unknown() {
        let error = "bogus".parse::<MessageFlag>().unwrap_err();
        assert!(matches!(error, Error::UndefinedFlag(token) if token == "bogus"));
    }

    #[test]
    fn test_message_flag_round_trips_through_name() {
        let flags = [
            MessageFlag::Fuzzy,
            MessageFlag::CFormat,
            MessageFlag::NoCFormat,
            MessageFlag::PythonFormat,
            MessageFlag::NoPythonFormat,
            MessageFlag::NoWrap,
        ];
        for flag in flags {
            assert_eq!(flag.name().parse::<MessageFlag>().unwrap(), flag);
        }
    }

    #[test]
    fn test_flag_set_deduplicates() {
        let mut flags = BTreeSet::new();
        flags.insert(MessageFlag::Fuzzy);
        flags.insert(MessageFlag::Fuzzy);
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn test_header_emptiness() {
        let mut header = MessageHeader::default();
        assert!(header.is_empty());
        assert!(!header.is_fuzzy());
        header.flags.insert(MessageFlag::Fuzzy);
        assert!(!header.is_empty());
        assert!(header.is_fuzzy());
    }

    #[test]
    fn test_message_accessors() {
        let message = Message::Plural {
            header: MessageHeader::default(),
            context: Some(MultipartString::from("menu")),
            id: MultipartString::from("%d file"),
            plural_id: MultipartString::from("%d files"),
            translations: vec![
                MultipartString::from("%d fichier"),
                MultipartString::from("%d fichiers"),
            ],
        };
        assert!(message.is_plural());
        assert_eq!(message.id().text(), "%d file");
        assert_eq!(message.context().unwrap().text(), "menu");
        assert!(message.header().is_empty());
    }

    #[test]
    fn test_json_cache_round_trip() {
        let messages = vec![Message::Singular {
            header: MessageHeader::default(),
            context: None,
            id: MultipartString::from("Hello"),
            translation: MultipartString::from("Bonjour"),
        }];
        let mut buffer = Vec::new();
        messages.to_writer(&mut buffer).unwrap();
        let restored = Vec::<Message>::from_bytes(&buffer).unwrap();
        assert_eq!(messages, restored);
    }
}
