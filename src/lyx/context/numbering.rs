//! Counters for headings, floats, equations and footnotes
//!
//! Headings use a hierarchy of ordered counters. Advancing one level resets every
//! deeper level, and the shallowest level seen in the document is the top of the
//! printed number: a document without chapters numbers its sections 1, 2, 3.
//! Parts have their own roman counter. Floats and equations are numbered within the
//! current top-level unit once the document has chapters.

use std::collections::HashMap;

/// Heading layouts in nesting order
pub const ORDERED_LEVELS: [&str; 6] = [
    "Chapter",
    "Section",
    "Subsection",
    "Subsubsection",
    "Paragraph",
    "Subparagraph",
];

/// Heading layouts numbered independently of the hierarchy
pub const UNIQUE_LEVELS: [&str; 1] = ["Part"];

/// Default depth of numbered headings, as in LaTeX (subsubsection)
pub const DEFAULT_SECNUMDEPTH: i32 = 3;

pub fn level_of(style: &str) -> Option<usize> {
    ORDERED_LEVELS.iter().position(|level| *level == style)
}

pub fn is_unique(style: &str) -> bool {
    UNIQUE_LEVELS.contains(&style)
}

pub fn roman(mut value: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (amount, numeral) in NUMERALS {
        while value >= amount {
            out.push_str(numeral);
            value -= amount;
        }
    }
    out
}

/// A, B, ... Z, AA, AB, ...
pub fn letters(mut value: u32) -> String {
    let mut out = Vec::new();
    while value > 0 {
        let digit = ((value - 1) % 26) as u8;
        out.push((b'A' + digit) as char);
        value = (value - 1) / 26;
    }
    out.iter().rev().collect()
}

#[derive(Debug, Clone, Default)]
pub struct NumberGenerator {
    ordered: Vec<u32>,
    top_level: Option<usize>,
    unique: HashMap<String, u32>,
    /// Per kind: the top-level unit it was last numbered in, and its count there
    chaptered: HashMap<String, ((bool, u32), u32)>,
    appendix: bool,
}

impl NumberGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_appendix(&self) -> bool {
        self.appendix
    }

    pub fn top_level(&self) -> Option<usize> {
        self.top_level
    }

    /// Switch top-level numbers to letters from here on
    pub fn start_appendix(&mut self) {
        self.appendix = true;
        match self.top_level {
            Some(top) => self.ordered.truncate(top),
            None => self.ordered.clear(),
        }
    }

    fn format_top(&self, value: u32) -> String {
        if self.appendix {
            letters(value)
        } else {
            value.to_string()
        }
    }

    /// Advance the counter at `level` and return the dotted number
    pub fn generate_ordered(&mut self, level: usize) -> String {
        let top = match self.top_level {
            Some(top) if top <= level => top,
            _ => {
                self.top_level = Some(level);
                level
            }
        };
        if self.ordered.len() <= level {
            self.ordered.resize(level + 1, 0);
        }
        self.ordered[level] += 1;
        self.ordered.truncate(level + 1);

        let mut parts = Vec::with_capacity(level + 1 - top);
        for (offset, value) in self.ordered[top..=level].iter().enumerate() {
            if offset == 0 {
                parts.push(self.format_top(*value));
            } else {
                parts.push(value.to_string());
            }
        }
        parts.join(".")
    }

    /// Advance an independent counter, e.g. parts or footnotes
    pub fn generate_unique(&mut self, kind: &str) -> u32 {
        let counter = self.unique.entry(kind.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Advance a counter that restarts in every top-level unit
    ///
    /// Documents whose top level is the chapter get `chapter.count`; others a plain
    /// running count.
    pub fn generate_chaptered(&mut self, kind: &str) -> String {
        let chapter = match self.top_level {
            Some(0) => self.ordered.first().copied().filter(|value| *value > 0),
            _ => None,
        };
        let unit = (self.appendix, chapter.unwrap_or(0));
        let entry = self
            .chaptered
            .entry(kind.to_string())
            .or_insert((unit, 0));
        if entry.0 != unit {
            *entry = (unit, 0);
        }
        entry.1 += 1;
        let count = entry.1;
        match chapter {
            Some(value) => format!("{}.{}", self.format_top(value), count),
            None => count.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapters_and_sections() {
        let mut numbers = NumberGenerator::new();
        let generated: Vec<String> = [0, 1, 1, 0, 1]
            .into_iter()
            .map(|level| numbers.generate_ordered(level))
            .collect();
        assert_eq!(generated, vec!["1", "1.1", "1.2", "2", "2.1"]);
    }

    #[test]
    fn test_sections_without_chapters() {
        let mut numbers = NumberGenerator::new();
        assert_eq!(numbers.generate_ordered(1), "1");
        assert_eq!(numbers.generate_ordered(2), "1.1");
        assert_eq!(numbers.generate_ordered(1), "2");
    }

    #[test]
    fn test_skipped_level_counts_from_zero() {
        let mut numbers = NumberGenerator::new();
        assert_eq!(numbers.generate_ordered(1), "1");
        assert_eq!(numbers.generate_ordered(3), "1.0.1");
    }

    #[test]
    fn test_appendix_switches_to_letters() {
        let mut numbers = NumberGenerator::new();
        numbers.generate_ordered(0);
        numbers.generate_ordered(0);
        numbers.start_appendix();
        assert_eq!(numbers.generate_ordered(0), "A");
        assert_eq!(numbers.generate_ordered(1), "A.1");
        assert_eq!(numbers.generate_ordered(0), "B");
        assert!(numbers.in_appendix());
    }

    #[test]
    fn test_chaptered_counters_restart() {
        let mut numbers = NumberGenerator::new();
        numbers.generate_ordered(0);
        assert_eq!(numbers.generate_chaptered("figure"), "1.1");
        assert_eq!(numbers.generate_chaptered("figure"), "1.2");
        assert_eq!(numbers.generate_chaptered("table"), "1.1");
        numbers.generate_ordered(0);
        assert_eq!(numbers.generate_chaptered("figure"), "2.1");
        numbers.start_appendix();
        numbers.generate_ordered(0);
        assert_eq!(numbers.generate_chaptered("figure"), "A.1");
    }

    #[test]
    fn test_chaptered_without_chapters() {
        let mut numbers = NumberGenerator::new();
        numbers.generate_ordered(1);
        assert_eq!(numbers.generate_chaptered("equation"), "1");
        numbers.generate_ordered(1);
        assert_eq!(numbers.generate_chaptered("equation"), "2");
    }

    #[test]
    fn test_roman_and_letters() {
        assert_eq!(roman(4), "IV");
        assert_eq!(roman(1994), "MCMXCIV");
        assert_eq!(letters(1), "A");
        assert_eq!(letters(26), "Z");
        assert_eq!(letters(27), "AA");
    }

    #[test]
    fn test_unique_counters() {
        let mut numbers = NumberGenerator::new();
        assert_eq!(numbers.generate_unique("Part"), 1);
        assert_eq!(numbers.generate_unique("footnote"), 1);
        assert_eq!(numbers.generate_unique("Part"), 2);
    }
}
