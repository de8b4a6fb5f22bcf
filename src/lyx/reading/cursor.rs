//! A forward-only cursor over the lines of a source

use crate::lyx::error::{ParseError, ParserResult};
use once_cell::unsync::OnceCell;

/// Walks the lines of a LyX source
///
/// Line terminators are stripped. The whitespace split of the current line is computed
/// on first use and kept until the cursor moves.
#[derive(Debug, Clone)]
pub struct LineCursor {
    lines: Vec<String>,
    index: usize,
    tokens: OnceCell<Vec<String>>,
}

impl LineCursor {
    pub fn new(source: &str) -> Self {
        Self {
            lines: source.lines().map(str::to_string).collect(),
            index: 0,
            tokens: OnceCell::new(),
        }
    }

    /// The current line, empty once the input is exhausted
    pub fn current(&self) -> &str {
        self.lines.get(self.index).map(String::as_str).unwrap_or("")
    }

    /// Move to the next line
    ///
    /// Advancing past the end is an error: every caller that advances expects another
    /// line to exist.
    pub fn advance(&mut self) -> ParserResult<()> {
        if self.at_end() {
            return Err(Box::new(ParseError::UnexpectedEndOfInput {
                line: self.lines.len(),
            }));
        }
        self.index += 1;
        self.tokens = OnceCell::new();
        Ok(())
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.lines.len()
    }

    /// Whitespace-separated tokens of the current line
    pub fn current_tokens(&self) -> &[String] {
        self.tokens.get_or_init(|| {
            self.current()
                .split_whitespace()
                .map(str::to_string)
                .collect()
        })
    }

    /// The current line holds only whitespace
    pub fn is_blank(&self) -> bool {
        self.current().trim().is_empty()
    }

    /// 1-based number of the current line
    pub fn line_number(&self) -> usize {
        self.index + 1
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_lines() {
        let mut cursor = LineCursor::new("\\begin_layout Standard\nHello\n\\end_layout\n");
        assert_eq!(cursor.current(), "\\begin_layout Standard");
        assert_eq!(cursor.line_number(), 1);
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), "Hello");
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        assert!(cursor.at_end());
        assert_eq!(cursor.current(), "");
    }

    #[test]
    fn test_advance_past_end_is_fatal() {
        let mut cursor = LineCursor::new("one");
        cursor.advance().unwrap();
        let err = cursor.advance().unwrap_err();
        assert_eq!(*err, ParseError::UnexpectedEndOfInput { line: 1 });
    }

    #[test]
    fn test_tokens_follow_the_cursor() {
        let mut cursor = LineCursor::new("\\begin_inset CommandInset ref\nLatexCommand ref");
        assert_eq!(
            cursor.current_tokens(),
            &["\\begin_inset", "CommandInset", "ref"]
        );
        cursor.advance().unwrap();
        assert_eq!(cursor.current_tokens(), &["LatexCommand", "ref"]);
    }

    #[test]
    fn test_strips_carriage_returns() {
        let cursor = LineCursor::new("\\lyxformat 413\r\n");
        assert_eq!(cursor.current(), "\\lyxformat 413");
        assert_eq!(cursor.line_count(), 1);
    }

    #[test]
    fn test_blank_lines() {
        let cursor = LineCursor::new("   \nx");
        assert!(cursor.is_blank());
    }
}
