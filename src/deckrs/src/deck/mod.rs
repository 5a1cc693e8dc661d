// deckrs/src/deck/mod.rs

//! The parsed document tree.
//!
//! A [`Document`] owns its top-level [`Section`]s; each section owns its
//! entries, rows and nested sections. Nothing is mutable once a parse has
//! returned.

pub mod core;
pub mod formatting;
pub mod section;
pub mod walk;

// Re-export the main types
pub use core::Document;
pub use formatting::write_document;
pub use section::{Binding, DataLine, KeyValue, Node, Section, SectionKind};
pub use walk::{Event, Walk};
