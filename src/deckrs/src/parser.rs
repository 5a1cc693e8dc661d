// deckrs/src/parser.rs

//! Document builder: turns classified lines into a [`Document`].
//!
//! Open sections live on an explicit stack of frames. A section is attached
//! to its parent only when it closes, so nesting depth is bounded by memory
//! and never by the call stack, and a failed parse drops nothing but a flat
//! list of frames.

use crate::deck::{Binding, DataLine, Document, KeyValue, Node, Section, SectionKind};
use crate::deck_types::parse_values;
use crate::error::{DeckError, Result};
use crate::grammar::{CloseStyle, Dialect, DuplicatePolicy, Grammar};
use crate::scanner::{Line, LineKind, Tokenizer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default input size limit: 64 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024 * 1024;

/// Options controlling parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Inputs longer than this many bytes are rejected before tokenizing.
    pub max_input_bytes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl ParseOptions {
    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }
}

/// Parser for one dialect's grammar.
///
/// A parser holds no per-input state and can be reused.
#[derive(Debug, Clone)]
pub struct DeckParser<'g> {
    grammar: &'g Grammar,
    options: ParseOptions,
}

impl DeckParser<'static> {
    /// Create a parser for one of the built-in dialects.
    pub fn new(dialect: Dialect) -> Self {
        Self::with_grammar(dialect.grammar())
    }
}

impl<'g> DeckParser<'g> {
    /// Create a parser for a caller-supplied grammar.
    pub fn with_grammar(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        self.grammar
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse deck text into a document.
    ///
    /// A leading byte-order mark is skipped.
    pub fn parse(&self, input: &str) -> Result<Document> {
        self.check_size(input.len())?;
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);

        let mut builder = Builder::new(self.grammar);
        for line in Tokenizer::new(input, self.grammar) {
            builder.feed(line?)?;
        }
        builder.finish()
    }

    /// Parse raw bytes, which must be valid UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Document> {
        self.check_size(bytes.len())?;

        let text = std::str::from_utf8(bytes).map_err(|e| {
            let valid = &bytes[..e.valid_up_to()];
            let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
            DeckError::lex(line, format!("invalid UTF-8: {}", e))
        })?;
        self.parse(text)
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if size > self.options.max_input_bytes {
            return Err(DeckError::InputTooLarge {
                size,
                limit: self.options.max_input_bytes,
            });
        }
        Ok(())
    }
}

/// A section still being built.
struct Frame {
    section: Section,
    /// Line the section was opened on
    line: usize,
    /// Normalized keys seen so far, when duplicates are rejected
    keys: HashSet<String>,
    /// Trailer block, closed by the next header or end of input
    implicit: bool,
}

impl Frame {
    fn new(section: Section, line: usize, implicit: bool) -> Self {
        Self {
            section,
            line,
            keys: HashSet::new(),
            implicit,
        }
    }
}

struct Builder<'g> {
    grammar: &'g Grammar,
    stack: Vec<Frame>,
    sections: Vec<Section>,
}

impl<'g> Builder<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            stack: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn feed(&mut self, line: Line) -> Result<()> {
        let Line { number, text, kind } = line;
        match kind {
            LineKind::SectionOpen { name, modifier } => self.open(name, modifier, number),
            LineKind::SectionClose { style, name } => self.close(style, name, text, number),
            LineKind::Assignment { key, values } => self.assign(key, values, text, number),
            LineKind::DataRow { tokens } => self.row(tokens, text, number),
        }
    }

    fn open(&mut self, name: String, modifier: Option<String>, line: usize) -> Result<()> {
        self.close_block();

        if modifier.is_some() && !self.grammar.allows_modifier {
            return Err(DeckError::invalid_header(
                line,
                format!(
                    "section '{}' takes no modifier in the {} dialect",
                    name, self.grammar.dialect
                ),
            ));
        }

        if let Some(max_depth) = self.grammar.max_depth {
            if self.stack.len() >= max_depth {
                if let Some(open) = self.stack.last() {
                    return Err(DeckError::UnclosedSection {
                        name: open.section.name().to_string(),
                        line: open.line,
                    });
                }
            }
        }

        let kind = if self.grammar.accepts_close(CloseStyle::Slash) {
            SectionKind::Group
        } else {
            SectionKind::Nested
        };
        log::debug!("open section '{}' at line {}", name, line);
        self.stack
            .push(Frame::new(Section::new(name, modifier, kind), line, false));
        Ok(())
    }

    fn close(
        &mut self,
        style: CloseStyle,
        name: Option<String>,
        text: String,
        line: usize,
    ) -> Result<()> {
        self.close_block();

        let expected = self.stack.last().map(|frame| frame.section.name().to_string());
        let matches = match (&expected, &name) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(open), Some(name)) => self.grammar.names_match(open, name),
        };
        if !self.grammar.accepts_close(style) || !matches {
            return Err(DeckError::UnexpectedClose {
                line,
                found: text,
                expected,
            });
        }

        if let Some(frame) = self.stack.pop() {
            log::debug!(
                "close section '{}' (opened at line {}) at line {}",
                frame.section.name(),
                frame.line,
                line
            );
            self.attach(frame.section);
        }
        Ok(())
    }

    fn assign(&mut self, key: String, values: Vec<String>, text: String, line: usize) -> Result<()> {
        match self.stack.last() {
            Some(frame) if !frame.implicit => {}
            _ => return Err(DeckError::stray(line, text)),
        }
        let values = parse_values(&values, self.grammar);
        self.push_entry(KeyValue::new(key, values, Binding::Equals), line)
    }

    fn row(&mut self, tokens: Vec<String>, text: String, line: usize) -> Result<()> {
        let first = match tokens.first() {
            Some(first) => first,
            // A line of bare separators
            None => return Ok(()),
        };

        let in_explicit = self.stack.iter().any(|frame| !frame.implicit);
        if !in_explicit && self.grammar.is_block_name(first) {
            self.close_block();
            let modifier = tokens[1..].join(" ");
            let modifier = (!modifier.is_empty()).then_some(modifier);
            log::debug!("open block '{}' at line {}", first, line);
            let section = Section::new(first.clone(), modifier, SectionKind::Block);
            self.stack.push(Frame::new(section, line, true));
            return Ok(());
        }

        if self.stack.is_empty() {
            return Err(DeckError::stray(line, text));
        }

        if self.grammar.keyword_rows && is_keyword(first) {
            let mut tokens = tokens.into_iter();
            let key = tokens.next().unwrap_or_default();
            let rest: Vec<String> = tokens.collect();
            let values = parse_values(&rest, self.grammar);
            return self.push_entry(KeyValue::new(key, values, Binding::Whitespace), line);
        }

        let values = parse_values(&tokens, self.grammar);
        if let Some(frame) = self.stack.last_mut() {
            frame.section.push(Node::Row(DataLine::new(values)));
        }
        Ok(())
    }

    fn push_entry(&mut self, entry: KeyValue, line: usize) -> Result<()> {
        let grammar = self.grammar;
        let frame = match self.stack.last_mut() {
            Some(frame) => frame,
            None => return Err(DeckError::stray(line, entry.key())),
        };

        if grammar.duplicate_keys == DuplicatePolicy::Reject
            && !frame.keys.insert(grammar.normalize_key(entry.key()))
        {
            return Err(DeckError::DuplicateKey {
                key: entry.key().to_string(),
                section: frame.section.name().to_string(),
                line,
            });
        }

        frame.section.push(Node::Entry(entry));
        Ok(())
    }

    /// Close the innermost section if it is a trailer block.
    fn close_block(&mut self) {
        if self.stack.last().map_or(false, |frame| frame.implicit) {
            if let Some(frame) = self.stack.pop() {
                log::debug!("close block '{}'", frame.section.name());
                self.attach(frame.section);
            }
        }
    }

    fn attach(&mut self, section: Section) {
        match self.stack.last_mut() {
            Some(parent) => parent.section.push(Node::Section(section)),
            None => self.sections.push(section),
        }
    }

    fn finish(mut self) -> Result<Document> {
        self.close_block();

        if let Some(open) = self.stack.last() {
            return Err(DeckError::UnclosedSection {
                name: open.section.name().to_string(),
                line: open.line,
            });
        }

        log::debug!(
            "parsed {} top-level sections ({} dialect)",
            self.sections.len(),
            self.grammar.dialect
        );
        Ok(Document::new(self.grammar.dialect, self.sections))
    }
}

/// Whether a row's first token reads as a keyword name.
fn is_keyword(token: &str) -> bool {
    token
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '@')
}
