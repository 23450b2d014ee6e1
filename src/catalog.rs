//! An eager, in-memory catalog layered on the streaming reader.

use std::io::BufRead;

use crate::error::Error;
use crate::reader::parse_reader;
use crate::traits::Parser;
use crate::types::Message;

/// Every message of one PO file, in file order.
///
/// [`Catalog`] drains the lazy reader up front, which is the convenient shape
/// for tools that look messages up or rewrite whole files. Use
/// [`parse_reader`](crate::parse_reader) directly when streaming matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Ordered list of all messages in this catalog.
    pub messages: Vec<Message>,
}

impl Catalog {
    /// Creates a new, empty `Catalog`.
    pub fn new() -> Self {
        Catalog {
            messages: Vec::new(),
        }
    }

    /// Returns an iterator over all messages.
    pub fn iter(&self) -> std::slice::Iter<Message> {
        self.messages.iter()
    }

    /// Finds a message by its full (concatenated) id, if present.
    pub fn find_message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|message| message.id().text() == id)
    }

    /// Finds a message by context and id, if present.
    pub fn find_message_with_context(&self, context: &str, id: &str) -> Option<&Message> {
        self.messages.iter().find(|message| {
            message.id().text() == id
                && message.context().map(|c| c.text()).as_deref() == Some(context)
        })
    }

    /// Appends a message to the catalog.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }
}

impl Parser for Catalog {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let messages = parse_reader(reader).collect::<Result<Vec<_>, _>>()?;
        Ok(Catalog { messages })
    }

    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        crate::writer::to_writer(writer, &self.messages)
    }
}
