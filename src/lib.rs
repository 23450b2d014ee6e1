#![forbid(unsafe_code)]
//! Gettext PO translation catalog reader and writer.
//!
//! Parses `.po` catalogs into a typed [`Message`] model and serializes them
//! back in canonical textual form. The read path is a lazy, forward-only,
//! single-pass iterator; the write path is its inverse.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pocodec::{Catalog, parse_file, traits::Parser};
//!
//! // Stream messages one at a time
//! for message in parse_file("fr.po")? {
//!     let message = message?;
//!     println!("{}", message.id());
//! }
//!
//! // Or load the whole catalog eagerly
//! let catalog = Catalog::read_from("fr.po")?;
//! catalog.write_to("fr_copy.po")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Behavior
//!
//! - Values split over several quoted lines are kept as a [`MultipartString`]
//!   with the original part boundaries, so catalogs round-trip exactly.
//! - Flags form a case-insensitive set drawn from a closed vocabulary.
//! - Parsing is fail-fast: the first malformed line ends the sequence with a
//!   typed [`Error`] carrying the offending text. There is no recovery mode.

pub mod catalog;
pub mod error;
pub mod escape;
pub mod lines;
pub mod reader;
pub mod traits;
pub mod types;
pub mod writer;

// Re-export most used items for easy consumption
pub use crate::{
    catalog::Catalog,
    error::Error,
    escape::{escape, unescape},
    reader::{MessageReader, parse_file, parse_reader},
    types::{Message, MessageFlag, MessageHeader, MessageLocation, MultipartString},
};
