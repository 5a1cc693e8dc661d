// deckrs/src/deck/formatting.rs

//! Serialization of documents back into deck text.
//!
//! Output is normalized: one statement per line, children indented one
//! level per enclosing section, comments and blank lines dropped. Values are
//! written with their source text, so the result parses back into an equal
//! document.

use super::core::Document;
use super::section::{Binding, KeyValue, Section, SectionKind};
use super::walk::Event;
use crate::WriteOptions;
use std::fmt::{self, Write};

/// Write `doc` to any `fmt::Write` sink.
pub fn write_document<W: Write>(out: &mut W, doc: &Document, options: &WriteOptions) -> fmt::Result {
    let separator = match doc.dialect().grammar().value_separator {
        Some(sep) => format!("{} ", sep),
        None => " ".to_string(),
    };
    let end_comma = match doc.dialect().grammar().value_separator {
        Some(sep) if options.end_comma => sep.to_string(),
        _ => String::new(),
    };

    let mut depth = 0usize;
    for event in doc.walk() {
        match event {
            Event::Enter(section) => {
                write_indent(out, options, depth)?;
                write_header(out, section, options)?;
                depth += 1;
            }
            Event::Exit(section) => {
                depth -= 1;
                write_footer(out, section, options, depth)?;
            }
            Event::Entry(kv) => {
                write_indent(out, options, depth)?;
                write_entry(out, kv, &separator, &end_comma)?;
            }
            Event::Row(row) => {
                write_indent(out, options, depth)?;
                write_joined(out, row.values().iter().map(|v| v.text()), " ")?;
                out.write_char('\n')?;
            }
        }
    }

    Ok(())
}

fn write_indent<W: Write>(out: &mut W, options: &WriteOptions, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(&options.indent)?;
    }
    Ok(())
}

fn section_name(section: &Section, options: &WriteOptions) -> String {
    if options.uppercase_names {
        section.name().to_uppercase()
    } else {
        section.name().to_string()
    }
}

fn write_header<W: Write>(out: &mut W, section: &Section, options: &WriteOptions) -> fmt::Result {
    if section.kind() != SectionKind::Block {
        out.write_char('&')?;
    }
    out.write_str(&section_name(section, options))?;
    if let Some(modifier) = section.modifier() {
        write!(out, " {}", modifier)?;
    }
    out.write_char('\n')
}

fn write_footer<W: Write>(
    out: &mut W,
    section: &Section,
    options: &WriteOptions,
    depth: usize,
) -> fmt::Result {
    match section.kind() {
        SectionKind::Block => Ok(()),
        SectionKind::Group => {
            write_indent(out, options, depth)?;
            out.write_str("/\n")
        }
        SectionKind::Nested => {
            write_indent(out, options, depth)?;
            writeln!(out, "&END {}", section_name(section, options))
        }
    }
}

fn write_entry<W: Write>(out: &mut W, kv: &KeyValue, separator: &str, end_comma: &str) -> fmt::Result {
    out.write_str(kv.key())?;
    match kv.binding() {
        Binding::Equals => {
            out.write_str(" =")?;
            if !kv.values().is_empty() {
                out.write_char(' ')?;
                write_joined(out, kv.values().iter().map(|v| v.text()), separator)?;
                out.write_str(end_comma)?;
            }
        }
        Binding::Whitespace => {
            for value in kv.values() {
                write!(out, " {}", value.text())?;
            }
        }
    }
    out.write_char('\n')
}

fn write_joined<'a, W, I>(out: &mut W, items: I, separator: &str) -> fmt::Result
where
    W: Write,
    I: Iterator<Item = &'a str>,
{
    for (idx, item) in items.enumerate() {
        if idx > 0 {
            out.write_str(separator)?;
        }
        out.write_str(item)?;
    }
    Ok(())
}
