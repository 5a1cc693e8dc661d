// deckrs/src/deck/walk.rs

//! Iterative pre-order traversal of a section tree.

use super::section::{DataLine, KeyValue, Node, Section};
use std::slice::Iter;

/// One step of a traversal.
///
/// Every `Enter` is matched by an `Exit` for the same section, with the
/// section's children reported in between.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Enter(&'a Section),
    Entry(&'a KeyValue),
    Row(&'a DataLine),
    Exit(&'a Section),
}

impl PartialEq for Event<'_> {
    /// Sections compare by header only; their contents arrive as later events.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Event::Enter(a), Event::Enter(b)) | (Event::Exit(a), Event::Exit(b)) => {
                a.same_header(b)
            }
            (Event::Entry(a), Event::Entry(b)) => a == b,
            (Event::Row(a), Event::Row(b)) => a == b,
            _ => false,
        }
    }
}

/// Traversal state: an explicit stack of partially visited sections.
pub struct Walk<'a> {
    root: Option<&'a Section>,
    stack: Vec<(&'a Section, Iter<'a, Node>)>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(root: &'a Section) -> Self {
        Self {
            root: Some(root),
            stack: Vec::new(),
        }
    }

    /// Number of sections currently entered and not yet exited.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            self.stack.push((root, root.children().iter()));
            return Some(Event::Enter(root));
        }

        let (section, next) = {
            let (section, children) = self.stack.last_mut()?;
            (*section, children.next())
        };

        match next {
            Some(Node::Section(child)) => {
                self.stack.push((child, child.children().iter()));
                Some(Event::Enter(child))
            }
            Some(Node::Entry(kv)) => Some(Event::Entry(kv)),
            Some(Node::Row(row)) => Some(Event::Row(row)),
            None => {
                self.stack.pop();
                Some(Event::Exit(section))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::section::SectionKind;

    #[test]
    fn test_enter_exit_pairs() {
        let mut outer = Section::new("DFT".to_string(), None, SectionKind::Nested);
        outer.push(Node::Section(Section::new(
            "SCF".to_string(),
            None,
            SectionKind::Nested,
        )));
        outer.push(Node::Row(DataLine::new(Vec::new())));

        let names: Vec<String> = outer
            .walk()
            .map(|event| match event {
                Event::Enter(s) => format!("+{}", s.name()),
                Event::Exit(s) => format!("-{}", s.name()),
                Event::Entry(kv) => kv.key().to_string(),
                Event::Row(_) => "row".to_string(),
            })
            .collect();

        assert_eq!(names, vec!["+DFT", "+SCF", "-SCF", "row", "-DFT"]);
    }

    #[test]
    fn test_depth_tracks_stack() {
        let mut outer = Section::new("A".to_string(), None, SectionKind::Nested);
        outer.push(Node::Section(Section::new(
            "B".to_string(),
            None,
            SectionKind::Nested,
        )));

        let mut walk = outer.walk();
        assert_eq!(walk.depth(), 0);
        walk.next();
        assert_eq!(walk.depth(), 1);
        walk.next();
        assert_eq!(walk.depth(), 2);
        walk.next();
        assert_eq!(walk.depth(), 1);
    }
}
