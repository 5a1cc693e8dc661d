// deckrs/src/deck_types/parsing.rs

//! Opportunistic typing of deck tokens.

use super::value::Value;
use crate::grammar::Grammar;

/// Type a single token under `grammar`.
///
/// Tries integer, then real, then the grammar's logical literals, then a
/// quoted string, and falls back to a bare token.
pub fn parse_value(token: &str, grammar: &Grammar) -> Value {
    let text = token.to_string();

    if let Some(value) = parse_integer(token) {
        return Value::Integer { value, text };
    }

    if let Some(value) = parse_real(token) {
        return Value::Real { value, text };
    }

    if let Some(value) = grammar.logical(token) {
        return Value::Logical { value, text };
    }

    if let Some(value) = parse_quoted(token) {
        return Value::Quoted { value, text };
    }

    Value::Bare(text)
}

/// Type every token of a line.
pub fn parse_values(tokens: &[String], grammar: &Grammar) -> Vec<Value> {
    tokens.iter().map(|t| parse_value(t, grammar)).collect()
}

/// Parse an integer, ignoring a Fortran kind suffix (`42_int64`).
pub fn parse_integer(token: &str) -> Option<i64> {
    let clean = strip_kind(token);
    let digits = clean.strip_prefix(&['+', '-'][..]).unwrap_or(clean);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    clean.parse::<i64>().ok()
}

/// Parse a floating-point literal, accepting Fortran `d`/`D` exponents.
///
/// Words such as `inf` or `nan` are not numbers here: the token must start
/// with a digit, or a `.` followed by a digit, after an optional sign, and
/// the result must be finite.
pub fn parse_real(token: &str) -> Option<f64> {
    let clean = strip_kind(token);
    let unsigned = clean.strip_prefix(&['+', '-'][..]).unwrap_or(clean);

    let mut chars = unsigned.chars();
    let starts_numeric = match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().map_or(false, |c| c.is_ascii_digit()),
        _ => false,
    };
    if !starts_numeric {
        return None;
    }

    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | 'd' | 'D' | '+' | '-'))
    {
        return None;
    }

    let normalized: String = clean
        .chars()
        .map(|c| match c {
            'd' | 'D' => 'e',
            other => other,
        })
        .collect();

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Unquote a `'...'` or `"..."` token, unescaping doubled quotes.
pub fn parse_quoted(token: &str) -> Option<String> {
    let quote = token.chars().next().filter(|c| *c == '\'' || *c == '"')?;

    if token.len() < 2 || !token.ends_with(quote) {
        return None;
    }

    let inner = &token[1..token.len() - 1];
    let doubled = format!("{}{}", quote, quote);
    let single = quote.to_string();

    // An odd quote inside means the token is several quoted pieces glued
    // together, not one string.
    if inner.replace(&doubled, "").contains(quote) {
        return None;
    }

    Some(inner.replace(&doubled, &single))
}

/// Strip a Fortran kind suffix, but only from something that looks numeric.
fn strip_kind(token: &str) -> &str {
    match token.find('_') {
        Some(pos) if pos > 0 && token[..pos].ends_with(|c: char| c.is_ascii_digit() || c == '.') => {
            &token[..pos]
        }
        _ => token,
    }
}
