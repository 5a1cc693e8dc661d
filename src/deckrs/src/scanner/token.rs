// deckrs/src/scanner/token.rs

//! Classified lines produced by the tokenizer.

use crate::grammar::CloseStyle;
use std::fmt;

/// One non-blank physical line after comment stripping.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Line number (1-based)
    pub number: usize,
    /// The trimmed, comment-free text of the line
    pub text: String,
    /// What the line does
    pub kind: LineKind,
}

impl Line {
    pub fn new(number: usize, text: String, kind: LineKind) -> Self {
        Self { number, text, kind }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.number, self.kind)
    }
}

/// Classification of a line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// `&NAME [MODIFIER...]`
    SectionOpen {
        name: String,
        modifier: Option<String>,
    },
    /// `/` or `&END [NAME]`
    SectionClose {
        style: CloseStyle,
        name: Option<String>,
    },
    /// `key = value...`, split on the first unquoted `=`
    Assignment { key: String, values: Vec<String> },
    /// Whitespace separated tokens with no `=`
    DataRow { tokens: Vec<String> },
}
