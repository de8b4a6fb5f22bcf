//! Stacks of pending closing markers
//!
//! Both grammars close scopes by markers that may appear deeper in the input than the
//! scope that opened them. A text run started by `\emph on` ends at `\emph default`,
//! but also at the `\end_layout` of its paragraph. A formula bracket ends at `}`, an
//! array cell at `&` or at the row separator. Each grammar keeps a stack of the
//! markers that are currently live.
//!
//! Optional markers are soft: a scan looking for the active ending looks past them.
//! A required marker blocks the scan, so an inner scope never closes an outer one
//! silently.

use serde::Serialize;
use thiserror::Error;

/// A live closing marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ending {
    pub marker: String,
    pub optional: bool,
}

/// Errors raised when closing a scope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndingError {
    #[error("no ending is pending")]
    Empty,
    /// The required marker was dropped while looking for the one being closed
    #[error("required ending {required:?} was left open")]
    RequiredLeftOpen { required: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndingStack {
    endings: Vec<Ending>,
}

impl EndingStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, marker: impl Into<String>, optional: bool) {
        self.endings.push(Ending {
            marker: marker.into(),
            optional,
        });
    }

    pub fn len(&self) -> usize {
        self.endings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endings.is_empty()
    }

    pub fn clear(&mut self) {
        self.endings.clear();
    }

    pub fn top(&self) -> Option<&Ending> {
        self.endings.last()
    }

    /// Drop the innermost ending without checking it
    pub fn discard(&mut self) -> Option<Ending> {
        self.endings.pop()
    }

    pub fn contains(&self, marker: &str) -> bool {
        self.endings.iter().any(|e| e.marker == marker)
    }

    /// Remove the innermost entry with this marker
    pub fn remove(&mut self, marker: &str) -> bool {
        match self.endings.iter().rposition(|e| e.marker == marker) {
            Some(index) => {
                self.endings.remove(index);
                true
            }
            None => false,
        }
    }

    /// The active ending accepted by `matches`
    ///
    /// Scans from the innermost entry. Optional entries that do not match are skipped;
    /// the first required entry ends the scan whether it matches or not.
    pub fn find<F>(&self, matches: F) -> Option<&Ending>
    where
        F: Fn(&str) -> bool,
    {
        for ending in self.endings.iter().rev() {
            if matches(&ending.marker) {
                return Some(ending);
            }
            if !ending.optional {
                return None;
            }
        }
        None
    }

    /// Pop entries until one accepted by `matches` is removed
    ///
    /// Optional entries above the match are discarded. Reaching a required entry that
    /// does not match removes it and reports it as left open.
    pub fn pop_until<F>(&mut self, matches: F) -> Result<Ending, EndingError>
    where
        F: Fn(&str) -> bool,
    {
        while let Some(ending) = self.endings.pop() {
            if matches(&ending.marker) {
                return Ok(ending);
            }
            if !ending.optional {
                return Err(EndingError::RequiredLeftOpen {
                    required: ending.marker,
                });
            }
        }
        Err(EndingError::Empty)
    }

    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.endings.iter().map(|e| e.marker.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_skips_optional_entries() {
        let mut stack = EndingStack::new();
        stack.push("}", false);
        stack.push("&", true);
        stack.push("\\\\", true);

        assert_eq!(stack.find(|m| m == "}").map(|e| e.marker.as_str()), Some("}"));
        assert_eq!(stack.find(|m| m == "&").map(|e| e.marker.as_str()), Some("&"));
        assert!(stack.find(|m| m == "]").is_none());
    }

    #[test]
    fn test_find_stops_at_required_entry() {
        let mut stack = EndingStack::new();
        stack.push("\\end{array}", false);
        stack.push("}", false);

        assert!(stack.find(|m| m == "\\end{array}").is_none());
    }

    #[test]
    fn test_pop_until_discards_optional_above_match() {
        let mut stack = EndingStack::new();
        stack.push("}", false);
        stack.push("&", true);

        let ending = stack.pop_until(|m| m == "}").unwrap();
        assert_eq!(ending.marker, "}");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_until_reports_required_left_open() {
        let mut stack = EndingStack::new();
        stack.push("\\end{cases}", false);
        stack.push("}", false);

        let err = stack.pop_until(|m| m == "\\end{cases}").unwrap_err();
        assert_eq!(
            err,
            EndingError::RequiredLeftOpen {
                required: "}".to_string()
            }
        );
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_pop_until_on_empty_stack() {
        let mut stack = EndingStack::new();
        assert_eq!(stack.pop_until(|_| true), Err(EndingError::Empty));
    }

    #[test]
    fn test_remove_takes_innermost() {
        let mut stack = EndingStack::new();
        stack.push("\\emph default", false);
        stack.push("\\series default", false);
        stack.push("\\emph default", false);

        assert!(stack.remove("\\emph default"));
        let markers: Vec<&str> = stack.markers().collect();
        assert_eq!(markers, vec!["\\emph default", "\\series default"]);
        assert!(!stack.remove("\\noun default"));
    }
}
