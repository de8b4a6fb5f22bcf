//! Error types for the line grammar
//!
//! Parsing is forgiving: nearly everything wrong with a source becomes a diagnostic.
//! The errors here are the few conditions that stop a conversion.

use thiserror::Error;

/// Errors that abort parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required read was attempted after the last line
    #[error("unexpected end of input after line {line}")]
    UnexpectedEndOfInput { line: usize },
}

/// Type alias for parser results with boxed errors (reduces stack size)
pub type ParserResult<T> = Result<T, Box<ParseError>>;

/// Errors raised while building a node type registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("start sequence {0:?} is already registered")]
    DuplicateStart(String),
}

/// Format the source lines around a line number
///
/// Shows 2 lines before, the line itself with a >> marker, and 2 lines after.
pub fn format_source_context(source: &str, line: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() || line == 0 {
        return String::new();
    }
    let target = line.min(lines.len()) - 1;
    let start = target.saturating_sub(2);
    let end = (target + 3).min(lines.len());

    let mut out = String::new();
    for (index, text) in lines[start..end].iter().enumerate() {
        let number = start + index + 1;
        let marker = if start + index == target { ">>" } else { "  " };
        out.push_str(&format!("{} {:>4} | {}\n", marker, number, text));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::UnexpectedEndOfInput { line: 7 };
        assert_eq!(err.to_string(), "unexpected end of input after line 7");
    }

    #[test]
    fn test_source_context_marks_line() {
        let source = "one\ntwo\nthree\nfour\nfive\nsix";
        let context = format_source_context(source, 3);
        assert!(context.contains(">>    3 | three"));
        assert!(context.contains("      1 | one"));
        assert!(context.contains("      5 | five"));
        assert!(!context.contains("six"));
    }

    #[test]
    fn test_source_context_clamps_past_end() {
        let context = format_source_context("only", 10);
        assert_eq!(context, ">>    1 | only\n");
    }
}
