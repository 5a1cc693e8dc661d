// deckrs/src/error.rs

//! Error types for deck tokenizing, building and serialization.
//!
//! Every error is terminal for the parse invocation that produced it: a
//! failed parse never yields a partial [`Document`](crate::Document).

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for deckrs operations.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Errors that can occur when reading, parsing or writing an input deck.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeckError {
    /// Bad quoting, bad encoding or an unreadable line.
    #[error("Lex error at line {line}: {message}")]
    Lex { line: usize, message: String },

    /// A close marker that does not match the innermost open section.
    #[error("Unexpected close '{found}' at line {line}: {}", describe_open(.expected))]
    UnexpectedClose {
        line: usize,
        found: String,
        expected: Option<String>,
    },

    /// End of input (or a forbidden nested open) while a section is still open.
    #[error("Section '{name}' opened at line {line} is never closed")]
    UnclosedSection { name: String, line: usize },

    /// A key repeated inside one section under a grammar that forbids it.
    #[error("Duplicate key '{key}' in section '{section}' at line {line}")]
    DuplicateKey {
        key: String,
        section: String,
        line: usize,
    },

    /// A section header the selected grammar cannot accept.
    #[error("Invalid section header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },

    /// Content that does not belong to any section.
    #[error("Stray content at line {line}: '{content}'")]
    StrayContent { line: usize, content: String },

    /// Input larger than the configured limit.
    #[error("Input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    /// A document that cannot be written in the requested output format.
    #[error("Invalid {format} output: {message}")]
    InvalidFormat { format: String, message: String },

    /// I/O error when reading or writing
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization error
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization error
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(String),
}

fn describe_open(expected: &Option<String>) -> String {
    match expected {
        Some(name) => format!("innermost open section is '{}'", name),
        None => "no section is open".to_string(),
    }
}

impl DeckError {
    /// Create a lex error.
    pub fn lex<S: Into<String>>(line: usize, message: S) -> Self {
        DeckError::Lex {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header<S: Into<String>>(line: usize, message: S) -> Self {
        DeckError::InvalidHeader {
            line,
            message: message.into(),
        }
    }

    /// Create a stray content error.
    pub fn stray<S: Into<String>>(line: usize, content: S) -> Self {
        DeckError::StrayContent {
            line,
            content: content.into(),
        }
    }

    /// The 1-based line the error refers to, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            DeckError::Lex { line, .. }
            | DeckError::UnexpectedClose { line, .. }
            | DeckError::UnclosedSection { line, .. }
            | DeckError::DuplicateKey { line, .. }
            | DeckError::InvalidHeader { line, .. }
            | DeckError::StrayContent { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Get the error category for grouping similar errors.
    pub fn category(&self) -> &'static str {
        match self {
            DeckError::Lex { .. } => "lex",
            DeckError::UnexpectedClose { .. } | DeckError::UnclosedSection { .. } => "nesting",
            DeckError::DuplicateKey { .. } => "duplicate",
            DeckError::InvalidHeader { .. } | DeckError::StrayContent { .. } => "syntax",
            DeckError::InputTooLarge { .. } => "limit",
            DeckError::InvalidFormat { .. } => "format",
            DeckError::Io(_) => "io",
            #[cfg(feature = "json")]
            DeckError::Json(_) => "json",
            #[cfg(feature = "yaml")]
            DeckError::Yaml(_) => "yaml",
        }
    }
}

impl From<fmt::Error> for DeckError {
    fn from(err: fmt::Error) -> Self {
        DeckError::InvalidFormat {
            format: "deck".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<io::Error> for DeckError {
    fn from(err: io::Error) -> Self {
        DeckError::Io(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for DeckError {
    fn from(err: serde_json::Error) -> Self {
        DeckError::Json(err.to_string())
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for DeckError {
    fn from(err: serde_yaml::Error) -> Self {
        DeckError::Yaml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeckError::lex(5, "unterminated quote");
        assert_eq!(err.to_string(), "Lex error at line 5: unterminated quote");

        let err = DeckError::UnclosedSection {
            name: "SUBSYS".to_string(),
            line: 12,
        };
        assert_eq!(
            err.to_string(),
            "Section 'SUBSYS' opened at line 12 is never closed"
        );

        let err = DeckError::UnexpectedClose {
            line: 3,
            found: "&END DFT".to_string(),
            expected: Some("SCF".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected close '&END DFT' at line 3: innermost open section is 'SCF'"
        );

        let err = DeckError::UnexpectedClose {
            line: 1,
            found: "/".to_string(),
            expected: None,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected close '/' at line 1: no section is open"
        );
    }

    #[test]
    fn test_error_line() {
        let err = DeckError::DuplicateKey {
            key: "nat".to_string(),
            section: "SYSTEM".to_string(),
            line: 9,
        };
        assert_eq!(err.line(), Some(9));
        assert_eq!(
            DeckError::InputTooLarge { size: 10, limit: 5 }.line(),
            None
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err = DeckError::from(io_err);

        match err {
            DeckError::Io(msg) => assert!(msg.contains("File not found")),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(DeckError::lex(1, "x").category(), "lex");
        assert_eq!(DeckError::stray(1, "x").category(), "syntax");
        assert_eq!(
            DeckError::UnclosedSection {
                name: "A".to_string(),
                line: 1
            }
            .category(),
            "nesting"
        );
        assert_eq!(DeckError::from(fmt::Error).category(), "format");
        assert_eq!(DeckError::from(fmt::Error).line(), None);
    }
}
