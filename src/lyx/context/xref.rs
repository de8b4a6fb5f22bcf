//! Labels and the references that point at them
//!
//! A reference decides its direction when it is built: if its label was already seen,
//! it points up; otherwise it waits in the pending table and points down. Building a
//! label drains the references waiting for it, so both sides know each other whatever
//! their order in the document.

use crate::lyx::ast::Direction;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelEntry {
    /// The number of the enclosing section, float or equation
    pub number: Option<String>,
    /// References pointing at this label
    pub references: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub key: String,
    pub direction: Direction,
    pub resolved: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CrossReferences {
    labels: HashMap<String, LabelEntry>,
    pending: HashMap<String, Vec<usize>>,
    references: Vec<ReferenceEntry>,
}

impl CrossReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a label; returns false when the key was already taken
    pub fn add_label(&mut self, key: &str) -> bool {
        let fresh = !self.labels.contains_key(key);
        let waiting = self.pending.remove(key).unwrap_or_default();
        for id in &waiting {
            if let Some(reference) = self.references.get_mut(*id) {
                reference.resolved = true;
            }
        }
        let entry = self.labels.entry(key.to_string()).or_default();
        entry.references.extend(waiting);
        fresh
    }

    /// Register a reference and decide its direction
    pub fn add_reference(&mut self, key: &str) -> (usize, Direction) {
        let id = self.references.len();
        let direction = match self.labels.get_mut(key) {
            Some(label) => {
                label.references.push(id);
                Direction::Up
            }
            None => {
                self.pending.entry(key.to_string()).or_default().push(id);
                Direction::Down
            }
        };
        self.references.push(ReferenceEntry {
            key: key.to_string(),
            direction,
            resolved: direction == Direction::Up,
        });
        (id, direction)
    }

    pub fn label(&self, key: &str) -> Option<&LabelEntry> {
        self.labels.get(key)
    }

    pub fn reference(&self, id: usize) -> Option<&ReferenceEntry> {
        self.references.get(id)
    }

    pub fn set_number(&mut self, key: &str, number: &str) {
        if let Some(label) = self.labels.get_mut(key) {
            label.number = Some(number.to_string());
        }
    }

    /// Set the number only if none was given yet
    pub fn default_number(&mut self, key: &str, number: &str) {
        if let Some(label) = self.labels.get_mut(key) {
            if label.number.is_none() {
                label.number = Some(number.to_string());
            }
        }
    }

    /// Keys referenced but never defined, sorted
    pub fn unresolved(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.pending.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
