// deckrs/src/deck_types/value.rs

//! Core Value enum and accessors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opportunistically typed deck token.
///
/// Every variant keeps the exact source text, so writing a value back out
/// never depends on how it was interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Integer literal, including an optional Fortran kind suffix
    Integer { value: i64, text: String },

    /// Floating-point literal (`1.0`, `1.d-8`, `2.5E3`)
    Real { value: f64, text: String },

    /// Logical literal as the dialect spells it
    Logical { value: bool, text: String },

    /// Quoted string; `value` has the quotes removed and doubled quotes unescaped
    Quoted { value: String, text: String },

    /// Anything else, kept verbatim
    Bare(String),
}

impl Value {
    /// Get the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer { .. } => "integer",
            Value::Real { .. } => "real",
            Value::Logical { .. } => "logical",
            Value::Quoted { .. } => "quoted",
            Value::Bare(_) => "bare",
        }
    }

    /// The original source text of this token.
    pub fn text(&self) -> &str {
        match self {
            Value::Integer { text, .. }
            | Value::Real { text, .. }
            | Value::Logical { text, .. }
            | Value::Quoted { text, .. } => text,
            Value::Bare(text) => text,
        }
    }

    /// Check if this value represents a numeric type.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer { .. } | Value::Real { .. })
    }

    /// The integer value, if this token is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The numeric value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer { value, .. } => Some(*value as f64),
            Value::Real { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The logical value, if this token is a logical literal.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Logical { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// String content: unquoted text for quoted strings, the raw token otherwise.
    ///
    /// Numbers and logicals return `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Quoted { value, .. } => Some(value),
            Value::Bare(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}
