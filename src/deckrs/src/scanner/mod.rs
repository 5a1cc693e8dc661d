// deckrs/src/scanner/mod.rs

//! Line-oriented tokenizer for input decks.
//!
//! Each physical line is stripped of its inline comment, trimmed, and
//! classified as a section open, a section close, an assignment or a data
//! row. Blank lines produce nothing.

pub mod lexer;
pub mod token;
pub mod tokenizer;

// Re-export main types and functions
pub use lexer::Lexer;
pub use token::{Line, LineKind};
pub use tokenizer::Tokenizer;

use crate::error::Result;
use crate::grammar::Grammar;

/// Convenience function to classify every line of a string up front.
pub fn scan(input: &str, grammar: &Grammar) -> Result<Vec<Line>> {
    Tokenizer::new(input, grammar).collect()
}
