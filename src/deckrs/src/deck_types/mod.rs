// deckrs/src/deck_types/mod.rs

//! Typed deck values that never lose their source text.

pub mod parsing;
pub mod value;


// Re-export the main types and functions
pub use parsing::{parse_integer, parse_quoted, parse_real, parse_value, parse_values};
pub use value::Value;
