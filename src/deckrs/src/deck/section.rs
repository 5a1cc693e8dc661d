// deckrs/src/deck/section.rs

//! Sections and their children.

use super::walk::{Event, Walk};
use crate::deck_types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a section is opened and closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// Namelist group: `&NAME ... /`
    Group,
    /// Namelist trailer card: `NAME [option]` followed by rows, closed implicitly
    Block,
    /// Nested section: `&NAME [MODIFIER] ... &END NAME`
    Nested,
}

/// How a key was bound to its values in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Binding {
    /// `key = value`
    Equals,
    /// `KEY value`
    Whitespace,
}

/// A key with zero or more positional values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    key: String,
    values: Vec<Value>,
    binding: Binding,
}

impl KeyValue {
    pub(crate) fn new(key: String, values: Vec<Value>, binding: Binding) -> Self {
        Self {
            key,
            values,
            binding,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    /// The first value, which is the whole value for scalar keys.
    pub fn value(&self) -> Option<&Value> {
        self.values.first()
    }
}

/// An ordered row of values with no key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLine {
    values: Vec<Value>,
}

impl DataLine {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A child of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Entry(KeyValue),
    Row(DataLine),
    Section(Section),
}

/// A named container of entries, rows and nested sections.
///
/// Equality is structural: names, modifiers, kinds, keys and value text in
/// order. Equality, cloning, `Debug` and dropping all run on an explicit
/// stack, so arbitrarily deep trees never grow the call stack. The serde
/// impls are derived and do recurse; see [`crate::MAX_SERDE_DEPTH`].
#[derive(Serialize, Deserialize)]
pub struct Section {
    name: String,
    modifier: Option<String>,
    kind: SectionKind,
    children: Vec<Node>,
}

impl Section {
    pub(crate) fn new(name: String, modifier: Option<String>, kind: SectionKind) -> Self {
        Self {
            name,
            modifier,
            kind,
            children: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inline modifier written after the name (`H` in `&KIND H`).
    pub fn modifier(&self) -> Option<&str> {
        self.modifier.as_deref()
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// All children in source order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Key-value children in order.
    pub fn entries(&self) -> impl Iterator<Item = &KeyValue> {
        self.children.iter().filter_map(|node| match node {
            Node::Entry(kv) => Some(kv),
            _ => None,
        })
    }

    /// Data rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &DataLine> {
        self.children.iter().filter_map(|node| match node {
            Node::Row(row) => Some(row),
            _ => None,
        })
    }

    /// Directly nested sections in order.
    pub fn subsections(&self) -> impl Iterator<Item = &Section> {
        self.children.iter().filter_map(|node| match node {
            Node::Section(section) => Some(section),
            _ => None,
        })
    }

    /// First entry with the given key (ASCII case-insensitive).
    pub fn get(&self, key: &str) -> Option<&KeyValue> {
        self.entries().find(|kv| kv.key.eq_ignore_ascii_case(key))
    }

    /// Every entry with the given key, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a KeyValue> + 'a {
        self.entries()
            .filter(move |kv| kv.key.eq_ignore_ascii_case(key))
    }

    /// First value of the first entry with the given key.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(KeyValue::value)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    /// First directly nested section with the given name.
    pub fn subsection(&self, name: &str) -> Option<&Section> {
        self.subsections()
            .find(|section| section.name.eq_ignore_ascii_case(name))
    }

    /// Follow a dotted path of nested section names (`DFT.SCF`).
    pub fn find(&self, path: &str) -> Option<&Section> {
        path.split('.')
            .try_fold(self, |section, name| section.subsection(name))
    }

    /// Iterative pre-order traversal of this section and everything in it.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(self)
    }

    /// Nesting depth, counting this section as 1.
    pub fn depth(&self) -> usize {
        let mut walk = self.walk();
        let mut deepest = 0;
        while walk.next().is_some() {
            deepest = deepest.max(walk.depth());
        }
        deepest
    }

    /// Copy of the header with no children.
    fn header(&self) -> Section {
        Section::new(self.name.clone(), self.modifier.clone(), self.kind)
    }

    /// Header equality, ignoring children.
    pub(crate) fn same_header(&self, other: &Section) -> bool {
        self.name == other.name && self.modifier == other.modifier && self.kind == other.kind
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.walk().eq(other.walk())
    }
}

impl Clone for Section {
    fn clone(&self) -> Self {
        let mut stack = vec![(self.header(), self.children.iter())];
        let mut root = None;

        while let Some((copy, children)) = stack.last_mut() {
            match children.next() {
                Some(Node::Section(child)) => stack.push((child.header(), child.children.iter())),
                Some(Node::Entry(kv)) => copy.push(Node::Entry(kv.clone())),
                Some(Node::Row(row)) => copy.push(Node::Row(row.clone())),
                None => {
                    if let Some((done, _)) = stack.pop() {
                        match stack.last_mut() {
                            Some((parent, _)) => parent.push(Node::Section(done)),
                            None => root = Some(done),
                        }
                    }
                }
            }
        }

        root.unwrap_or_else(|| self.header())
    }
}

impl fmt::Debug for Section {
    /// Flat list of traversal events rather than nested structs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for event in self.walk() {
            match event {
                Event::Enter(s) => list.entry(&format_args!(
                    "Enter({:?}, {:?}, {:?})",
                    s.name, s.modifier, s.kind
                )),
                Event::Exit(s) => list.entry(&format_args!("Exit({:?})", s.name)),
                Event::Entry(kv) => list.entry(kv),
                Event::Row(row) => list.entry(row),
            };
        }
        list.finish()
    }
}

impl Drop for Section {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Section(mut section) = node {
                pending.append(&mut section.children);
            }
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modifier {
            Some(modifier) => write!(f, "{} {}", self.name, modifier),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck_types::parse_values;
    use crate::grammar::NESTED;

    fn entry(key: &str, tokens: &[&str]) -> Node {
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        Node::Entry(KeyValue::new(
            key.to_string(),
            parse_values(&tokens, &NESTED),
            Binding::Whitespace,
        ))
    }

    fn kind_h() -> Section {
        let mut kind = Section::new("KIND".to_string(), Some("H".to_string()), SectionKind::Nested);
        kind.push(entry("BASIS_SET", &["DZVP-GTH"]));
        kind.push(entry("ELEMENT", &["H"]));
        kind
    }

    #[test]
    fn test_lookup() {
        let mut subsys = Section::new("SUBSYS".to_string(), None, SectionKind::Nested);
        subsys.push(Node::Section(kind_h()));

        let kind = subsys.subsection("kind").unwrap();
        assert_eq!(kind.modifier(), Some("H"));
        assert_eq!(kind.get_str("element"), Some("H"));
        assert_eq!(kind.get("missing"), None);
        assert_eq!(subsys.find("KIND").unwrap().name(), "KIND");
        assert!(subsys.find("KIND.NOPE").is_none());
    }

    #[test]
    fn test_get_all_keeps_repeats() {
        let mut coord = Section::new("COORD".to_string(), None, SectionKind::Nested);
        coord.push(entry("H", &["0", "0", "0"]));
        coord.push(entry("H", &["0.74", "0", "0"]));

        let all: Vec<_> = coord.get_all("H").collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].values()[0].as_f64(), Some(0.74));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(kind_h(), kind_h());

        let mut other = kind_h();
        other.push(entry("MASS", &["1.008"]));
        assert_ne!(kind_h(), other);

        let renamed = Section::new("KIND".to_string(), Some("O".to_string()), SectionKind::Nested);
        assert_ne!(
            Section::new("KIND".to_string(), Some("H".to_string()), SectionKind::Nested),
            renamed
        );
    }

    #[test]
    fn test_deep_tree_drops_without_recursion() {
        let mut root = Section::new("L0".to_string(), None, SectionKind::Nested);
        for depth in 1..100_000 {
            let mut parent = Section::new(format!("L{}", depth), None, SectionKind::Nested);
            parent.push(Node::Section(root));
            root = parent;
        }
        assert_eq!(root.walk().count(), 200_000);
        assert_eq!(root.depth(), 100_000);

        let copy = root.clone();
        assert_eq!(copy, root);
        assert!(format!("{:?}", copy).starts_with("[Enter(\"L99999\", None, Nested)"));
        drop(copy);
        drop(root);
    }

    #[test]
    fn test_clone_keeps_children_in_order() {
        let mut subsys = Section::new("SUBSYS".to_string(), None, SectionKind::Nested);
        subsys.push(entry("RUN", &["1"]));
        subsys.push(Node::Section(kind_h()));
        subsys.push(Node::Row(DataLine::new(Vec::new())));

        let copy = subsys.clone();
        assert_eq!(copy, subsys);
        assert_eq!(copy.len(), 3);
        assert!(matches!(copy.children()[2], Node::Row(_)));
        assert_eq!(copy.depth(), 2);
    }
}
