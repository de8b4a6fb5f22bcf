//! Bibliography entries and the citations pointing at them

use crate::lyx::ast::Direction;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub key: String,
    /// The visible label: the explicit one, or the entry's ordinal
    pub label: String,
    /// Citations of this entry and where they sit relative to it
    pub citations: Vec<(usize, Direction)>,
}

#[derive(Debug, Clone, Default)]
pub struct Bibliography {
    entries: HashMap<String, BibEntry>,
    order: Vec<String>,
    pending: HashMap<String, Vec<usize>>,
    citations: usize,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry; returns its visible label
    pub fn add_entry(&mut self, key: &str, label: Option<&str>) -> String {
        let label = match label {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => (self.order.len() + 1).to_string(),
        };
        let waiting = self.pending.remove(key).unwrap_or_default();
        if !self.entries.contains_key(key) {
            self.order.push(key.to_string());
        }
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| BibEntry {
                key: key.to_string(),
                label: label.clone(),
                citations: Vec::new(),
            });
        entry
            .citations
            .extend(waiting.into_iter().map(|id| (id, Direction::Up)));
        entry.label.clone()
    }

    /// Register a citation of one or more keys; returns its id
    pub fn cite(&mut self, keys: &[String]) -> usize {
        let id = self.citations;
        self.citations += 1;
        for key in keys {
            match self.entries.get_mut(key) {
                Some(entry) => entry.citations.push((id, Direction::Down)),
                None => self.pending.entry(key.clone()).or_default().push(id),
            }
        }
        id
    }

    pub fn entry(&self, key: &str) -> Option<&BibEntry> {
        self.entries.get(key)
    }

    /// Entries in the order they were registered
    pub fn entries(&self) -> impl Iterator<Item = &BibEntry> {
        self.order.iter().filter_map(|key| self.entries.get(key))
    }

    pub fn unresolved(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.pending.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_numbered_in_order() {
        let mut bib = Bibliography::new();
        assert_eq!(bib.add_entry("knuth", None), "1");
        assert_eq!(bib.add_entry("lamport", Some("Lam94")), "Lam94");
        assert_eq!(bib.add_entry("wirth", None), "3");
        let keys: Vec<&str> = bib.entries().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["knuth", "lamport", "wirth"]);
    }

    #[test]
    fn test_citations_before_entries_resolve_later() {
        let mut bib = Bibliography::new();
        let id = bib.cite(&["knuth".to_string(), "lamport".to_string()]);
        assert_eq!(bib.unresolved(), vec!["knuth", "lamport"]);
        bib.add_entry("knuth", None);
        assert_eq!(bib.entry("knuth").unwrap().citations, vec![(id, Direction::Up)]);
        assert_eq!(bib.unresolved(), vec!["lamport"]);
    }
}
