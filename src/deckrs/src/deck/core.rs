// deckrs/src/deck/core.rs

//! Core Document struct and basic operations.

use super::formatting::write_document;
use super::section::{Section, SectionKind};
use super::walk::Event;
use crate::error::Result;
use crate::grammar::Dialect;
use crate::WriteOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed input deck: the dialect it was read under and its top-level
/// sections in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    dialect: Dialect,
    sections: Vec<Section>,
}

impl Document {
    pub(crate) fn new(dialect: Dialect, sections: Vec<Section>) -> Self {
        Self { dialect, sections }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Top-level sections in order, trailer blocks included.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get the number of top-level sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Top-level sections closed by an explicit marker.
    pub fn groups(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|section| section.kind() != SectionKind::Block)
    }

    /// Trailer blocks (namelist cards such as `K_POINTS`).
    pub fn blocks(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|section| section.kind() == SectionKind::Block)
    }

    /// First top-level section with the given name (ASCII case-insensitive).
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.name().eq_ignore_ascii_case(name))
    }

    /// Follow a dotted path from the top level (`FORCE_EVAL.DFT.SCF`).
    pub fn find(&self, path: &str) -> Option<&Section> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let top = self.section(head)?;
        match rest {
            Some(rest) => top.find(rest),
            None => Some(top),
        }
    }

    /// Iterative traversal over every top-level section in turn.
    pub fn walk(&self) -> impl Iterator<Item = Event<'_>> {
        self.sections.iter().flat_map(Section::walk)
    }

    /// Deepest section nesting in the document; 0 when it is empty.
    pub fn depth(&self) -> usize {
        self.sections.iter().map(Section::depth).max().unwrap_or(0)
    }

    /// Serialize back into deck text.
    pub fn to_deck_string(&self, options: &WriteOptions) -> Result<String> {
        let mut output = String::new();
        write_document(&mut output, self, options)?;
        Ok(output)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_document(f, self, &WriteOptions::default())
    }
}
