//! Index entries collected from the document

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct IndexEntries {
    /// Anchors of each term, keyed by the term
    terms: BTreeMap<String, Vec<String>>,
    count: usize,
}

impl IndexEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an occurrence of a term; returns its anchor
    pub fn register(&mut self, term: &str) -> String {
        self.count += 1;
        let anchor = format!("index-{}", self.count);
        self.terms
            .entry(term.trim().to_string())
            .or_default()
            .push(anchor.clone());
        anchor
    }

    /// Terms sorted case-insensitively with their anchors
    pub fn sorted(&self) -> Vec<(&str, &[String])> {
        let mut terms: Vec<(&str, &[String])> = self
            .terms
            .iter()
            .map(|(term, anchors)| (term.as_str(), anchors.as_slice()))
            .collect();
        terms.sort_by_key(|(term, _)| term.to_lowercase());
        terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
