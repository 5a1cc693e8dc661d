// deckrs/src/scanner/tokenizer.rs

//! Lazy line classifier for input decks.

use super::lexer::Lexer;
use super::token::{Line, LineKind};
use crate::error::{DeckError, Result};
use crate::grammar::{CloseStyle, Grammar};
use std::iter::Enumerate;
use std::str::Lines;

/// Splits raw text into classified lines.
///
/// The tokenizer is a single-pass iterator; to scan the same text again,
/// construct a new one.
pub struct Tokenizer<'a> {
    lines: Enumerate<Lines<'a>>,
    grammar: &'a Grammar,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input.
    pub fn new(input: &'a str, grammar: &'a Grammar) -> Self {
        Self {
            lines: input.lines().enumerate(),
            grammar,
        }
    }

    fn lexer<'l>(&self, text: &'l str, number: usize) -> Lexer<'l> {
        Lexer::new(text, number)
            .with_comment_marker(self.grammar.comment_marker)
            .with_separator(self.grammar.value_separator)
    }

    /// Classify one comment-free, trimmed, non-empty line.
    fn classify(&self, text: &str, number: usize) -> Result<LineKind> {
        if let Some(rest) = text.strip_prefix('&') {
            return self.classify_header(rest.trim_start(), number);
        }

        if text == "/" {
            return Ok(LineKind::SectionClose {
                style: CloseStyle::Slash,
                name: None,
            });
        }

        let lexer = self.lexer(text, number);
        if let Some(eq) = lexer.find_unquoted('=') {
            let key = text[..eq].trim();
            if key.is_empty() {
                return Err(DeckError::lex(number, "assignment without a key"));
            }
            let values = self.lexer(&text[eq + 1..], number).split_tokens()?;
            return Ok(LineKind::Assignment {
                key: key.to_string(),
                values,
            });
        }

        Ok(LineKind::DataRow {
            tokens: lexer.split_tokens()?,
        })
    }

    fn classify_header(&self, rest: &str, number: usize) -> Result<LineKind> {
        let mut words = self.lexer(rest, number).split_tokens()?.into_iter();
        let name = match words.next() {
            Some(name) => name,
            None => return Err(DeckError::lex(number, "'&' without a section name")),
        };

        if name.eq_ignore_ascii_case("END") {
            return Ok(LineKind::SectionClose {
                style: CloseStyle::End,
                name: words.next(),
            });
        }

        // Quoted modifier words keep their inner spacing.
        let modifier = words.collect::<Vec<_>>().join(" ");
        Ok(LineKind::SectionOpen {
            name,
            modifier: if modifier.is_empty() {
                None
            } else {
                Some(modifier)
            },
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (idx, raw) = self.lines.next()?;
            let number = idx + 1;

            let stripped = match self.lexer(raw, number).strip_comment() {
                Ok(stripped) => stripped.trim(),
                Err(e) => return Some(Err(e)),
            };
            if stripped.is_empty() {
                continue;
            }

            let line = self
                .classify(stripped, number)
                .map(|kind| Line::new(number, stripped.to_string(), kind));
            if let Ok(line) = &line {
                log::trace!("{}", line);
            }
            return Some(line);
        }
    }
}
