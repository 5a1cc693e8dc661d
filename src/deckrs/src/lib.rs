// deckrs/src/lib.rs

//! A Rust-native library for parsing and writing scientific simulation input decks.
//!
//! This library provides functionality to:
//! - Parse Quantum-ESPRESSO style namelist decks (`&NAME ... /` groups plus trailer cards)
//! - Parse CP2K style nested decks (`&NAME [MODIFIER] ... &END NAME`) of any depth
//! - Query the resulting immutable document tree by section path and key
//! - Write documents back out as normalized deck text
//! - Convert documents to and from JSON or YAML (`json` / `yaml` features)
//!
//! The dialect is always chosen by the caller:
//!
//! ```
//! use deckrs::Dialect;
//!
//! fn main() -> Result<(), deckrs::DeckError> {
//!     let doc = deckrs::reads("&GLOBAL\n  PROJECT water\n&END GLOBAL\n", Dialect::Nested)?;
//!     assert_eq!(doc.find("GLOBAL").and_then(|s| s.get_str("PROJECT")), Some("water"));
//!     Ok(())
//! }
//! ```

pub mod deck;
pub mod deck_types;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod scanner;

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

pub use deck::{Binding, DataLine, Document, Event, KeyValue, Node, Section, SectionKind};
pub use deck_types::Value;
pub use error::{DeckError, Result};
pub use grammar::{Dialect, Grammar, NAMELIST, NESTED};
pub use parser::{DeckParser, ParseOptions};

/// Parse a deck from a string.
///
/// # Examples
///
/// ```
/// fn main() -> Result<(), deckrs::DeckError> {
///     let deck = "&SYSTEM\n  nat = 2\n/\n";
///     let doc = deckrs::reads(deck, deckrs::Dialect::Namelist)?;
///     assert_eq!(doc.section("system").unwrap().get_i64("nat"), Some(2));
///     Ok(())
/// }
/// ```
pub fn reads(content: &str, dialect: Dialect) -> Result<Document> {
    DeckParser::new(dialect).parse(content)
}

/// Parse a deck from raw bytes, which must be valid UTF-8.
pub fn parse_bytes(bytes: &[u8], dialect: Dialect) -> Result<Document> {
    DeckParser::new(dialect).parse_bytes(bytes)
}

/// Parse a deck from a file path.
///
/// The file size is checked against the default input limit before the file
/// is read.
///
/// # Examples
///
/// ```no_run
/// fn main() -> Result<(), deckrs::DeckError> {
///     let doc = deckrs::read("pw.in", deckrs::Dialect::Namelist)?;
///     println!("{}", doc);
///     Ok(())
/// }
/// ```
pub fn read<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Document> {
    read_with_options(path, dialect, ParseOptions::default())
}

/// Parse a deck from a file path with specific options.
pub fn read_with_options<P: AsRef<Path>>(
    path: P,
    dialect: Dialect,
    options: ParseOptions,
) -> Result<Document> {
    let path = path.as_ref();

    let size = fs_err::metadata(path)?.len();
    if size > options.max_input_bytes as u64 {
        return Err(DeckError::InputTooLarge {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            limit: options.max_input_bytes,
        });
    }

    let bytes = fs_err::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    DeckParser::new(dialect)
        .with_options(options)
        .parse_bytes(&bytes)
}

/// Serialize a document into deck text.
pub fn to_deck_string(doc: &Document, options: &WriteOptions) -> Result<String> {
    doc.to_deck_string(options)
}

/// Write a document to any writer implementing the Write trait.
pub fn write_to_writer<W: Write>(
    doc: &Document,
    writer: &mut W,
    options: &WriteOptions,
) -> Result<()> {
    let formatted = doc.to_deck_string(options)?;
    writer.write_all(formatted.as_bytes())?;
    Ok(())
}

/// Options for controlling deck output formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Indentation string (spaces or tabs), repeated once per nesting level
    pub indent: String,
    /// Whether to add the value separator at the end of namelist assignments
    pub end_comma: bool,
    /// Whether to upper-case section names
    pub uppercase_names: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(), // 4 spaces
            end_comma: false,
            uppercase_names: false,
        }
    }
}

impl WriteOptions {
    pub fn with_indent<S: Into<String>>(mut self, indent: S) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_end_comma(mut self, end_comma: bool) -> Self {
        self.end_comma = end_comma;
        self
    }

    pub fn with_uppercase_names(mut self, uppercase_names: bool) -> Self {
        self.uppercase_names = uppercase_names;
        self
    }
}

/// Deepest section nesting `to_json`/`to_yaml` will write.
///
/// The serde impls recurse once per level, and both `serde_json` and
/// `serde_yaml` refuse to read back more than 128 levels of JSON/YAML
/// nesting (about three per section).
pub const MAX_SERDE_DEPTH: usize = 32;

#[cfg(any(feature = "json", feature = "yaml"))]
fn check_serde_depth(doc: &Document, format: &str) -> Result<()> {
    let depth = doc.depth();
    if depth > MAX_SERDE_DEPTH {
        return Err(DeckError::InvalidFormat {
            format: format.to_string(),
            message: format!(
                "section nesting depth {} exceeds the limit of {}",
                depth, MAX_SERDE_DEPTH
            ),
        });
    }
    Ok(())
}

#[cfg(feature = "json")]
/// Convert a document to JSON string.
///
/// Fails with `InvalidFormat` for documents nested deeper than
/// [`MAX_SERDE_DEPTH`].
pub fn to_json(doc: &Document) -> Result<String> {
    check_serde_depth(doc, "json")?;
    serde_json::to_string_pretty(doc).map_err(DeckError::from)
}

#[cfg(feature = "json")]
/// Parse a document from JSON string.
pub fn from_json(json: &str) -> Result<Document> {
    serde_json::from_str(json).map_err(DeckError::from)
}

#[cfg(feature = "yaml")]
/// Convert a document to YAML string.
///
/// Fails with `InvalidFormat` for documents nested deeper than
/// [`MAX_SERDE_DEPTH`].
pub fn to_yaml(doc: &Document) -> Result<String> {
    check_serde_depth(doc, "yaml")?;
    serde_yaml::to_string(doc).map_err(DeckError::from)
}

#[cfg(feature = "yaml")]
/// Parse a document from YAML string.
pub fn from_yaml(yaml: &str) -> Result<Document> {
    serde_yaml::from_str(yaml).map_err(DeckError::from)
}
