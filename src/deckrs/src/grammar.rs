// deckrs/src/grammar.rs

//! Static rule tables for the two supported deck dialects.
//!
//! A [`Grammar`] is plain data: the tokenizer reads its comment marker and
//! value separator, the builder reads everything else. Dialect selection is
//! always explicit; nothing here sniffs content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two input dialects a caller can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Fortran namelist groups (`&NAME ... /`) followed by trailer cards.
    Namelist,
    /// Arbitrarily nested `&NAME [MODIFIER] ... &END NAME` sections.
    Nested,
}

impl Dialect {
    /// The static rule table for this dialect.
    pub fn grammar(self) -> &'static Grammar {
        match self {
            Dialect::Namelist => &NAMELIST,
            Dialect::Nested => &NESTED,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Namelist => write!(f, "namelist"),
            Dialect::Nested => write!(f, "nested"),
        }
    }
}

/// How a section close marker was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseStyle {
    /// A line holding only `/`.
    Slash,
    /// `&END`, optionally followed by the section name.
    End,
}

/// What happens when a key repeats inside one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateKey`.
    Reject,
    /// Keep every occurrence as its own child.
    Allow,
}

/// The rule set a deck is parsed under.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    /// Dialect this grammar implements; recorded on parsed documents.
    pub dialect: Dialect,
    /// Inline comment marker; honoured only outside quotes.
    pub comment_marker: char,
    /// Extra token separator besides whitespace (`,` in namelists).
    pub value_separator: Option<char>,
    /// Close markers this grammar accepts.
    pub close_styles: &'static [CloseStyle],
    /// Whether `&NAME` may be followed by modifier tokens.
    pub allows_modifier: bool,
    /// Maximum depth of explicit sections, `None` for unbounded.
    pub max_depth: Option<usize>,
    /// Duplicate key handling within one section.
    pub duplicate_keys: DuplicatePolicy,
    /// Whether section names and keys compare case-sensitively.
    pub case_sensitive: bool,
    /// Whether `KEY v1 v2` lines (no `=`) become key-value entries.
    pub keyword_rows: bool,
    /// Card names that open an implicitly closed trailer block.
    pub block_names: &'static [&'static str],
    /// Literals read as logical true (compared case-insensitively).
    pub true_literals: &'static [&'static str],
    /// Literals read as logical false (compared case-insensitively).
    pub false_literals: &'static [&'static str],
}

/// Quantum-ESPRESSO style namelist input.
pub static NAMELIST: Grammar = Grammar {
    dialect: Dialect::Namelist,
    comment_marker: '!',
    value_separator: Some(','),
    close_styles: &[CloseStyle::Slash, CloseStyle::End],
    allows_modifier: false,
    max_depth: Some(1),
    duplicate_keys: DuplicatePolicy::Reject,
    case_sensitive: false,
    keyword_rows: false,
    block_names: &[
        "ATOMIC_SPECIES",
        "ATOMIC_POSITIONS",
        "K_POINTS",
        "ADDITIONAL_K_POINTS",
        "CELL_PARAMETERS",
        "OCCUPATIONS",
        "CONSTRAINTS",
        "ATOMIC_VELOCITIES",
        "ATOMIC_FORCES",
        "SOLVENTS",
        "HUBBARD",
    ],
    true_literals: &[".true.", ".t."],
    false_literals: &[".false.", ".f."],
};

/// CP2K style nested section input.
pub static NESTED: Grammar = Grammar {
    dialect: Dialect::Nested,
    comment_marker: '#',
    value_separator: None,
    close_styles: &[CloseStyle::End],
    allows_modifier: true,
    max_depth: None,
    duplicate_keys: DuplicatePolicy::Allow,
    case_sensitive: false,
    keyword_rows: true,
    block_names: &[],
    true_literals: &["T", "TRUE", "ON", "YES", ".TRUE."],
    false_literals: &["F", "FALSE", "OFF", "NO", ".FALSE."],
};

impl Grammar {
    /// Compare two section names or keys under this grammar's case policy.
    pub fn names_match(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }

    /// Normalize a key for duplicate detection.
    pub fn normalize_key(&self, key: &str) -> String {
        if self.case_sensitive {
            key.to_string()
        } else {
            key.to_ascii_lowercase()
        }
    }

    /// Whether `word` names a trailer block.
    pub fn is_block_name(&self, word: &str) -> bool {
        self.block_names
            .iter()
            .any(|name| self.names_match(name, word))
    }

    /// Whether `style` closes a section under this grammar.
    pub fn accepts_close(&self, style: CloseStyle) -> bool {
        self.close_styles.contains(&style)
    }

    /// Read `token` as a logical literal, if it is one.
    pub fn logical(&self, token: &str) -> Option<bool> {
        if self
            .true_literals
            .iter()
            .any(|lit| lit.eq_ignore_ascii_case(token))
        {
            Some(true)
        } else if self
            .false_literals
            .iter()
            .any(|lit| lit.eq_ignore_ascii_case(token))
        {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_grammar() {
        assert_eq!(Dialect::Namelist.grammar().dialect, Dialect::Namelist);
        assert_eq!(Dialect::Nested.grammar().dialect, Dialect::Nested);
        assert_eq!(NAMELIST.comment_marker, '!');
        assert_eq!(NESTED.comment_marker, '#');
    }

    #[test]
    fn test_logical_literals() {
        assert_eq!(NAMELIST.logical(".TRUE."), Some(true));
        assert_eq!(NAMELIST.logical(".f."), Some(false));
        assert_eq!(NAMELIST.logical("T"), None);

        assert_eq!(NESTED.logical("on"), Some(true));
        assert_eq!(NESTED.logical("OFF"), Some(false));
        assert_eq!(NESTED.logical("T"), Some(true));
        assert_eq!(NESTED.logical("H"), None);
    }

    #[test]
    fn test_block_names() {
        assert!(NAMELIST.is_block_name("K_POINTS"));
        assert!(NAMELIST.is_block_name("atomic_species"));
        assert!(!NAMELIST.is_block_name("H"));
        assert!(!NESTED.is_block_name("K_POINTS"));
    }

    #[test]
    fn test_close_styles() {
        assert!(NAMELIST.accepts_close(CloseStyle::Slash));
        assert!(NAMELIST.accepts_close(CloseStyle::End));
        assert!(NESTED.accepts_close(CloseStyle::End));
        assert!(!NESTED.accepts_close(CloseStyle::Slash));
    }
}
