//! A character position inside a formula source

use crate::lyx::endings::{EndingError, EndingStack};

/// Reads a formula character by character
///
/// The position is finished at the end of the text and wherever one of its live
/// endings matches, so a recognizer parsing the inside of `{...}` simply runs until
/// the position reports finished.
#[derive(Debug, Clone)]
pub struct TextPosition {
    chars: Vec<char>,
    index: usize,
    endings: EndingStack,
    errors: Vec<String>,
    /// Current recursion depth of the formula grammar
    pub depth: usize,
    /// Depth at which the grammar stops descending
    pub max_depth: usize,
}

fn matches_at(chars: &[char], index: usize, text: &str) -> bool {
    let mut position = index;
    for expected in text.chars() {
        match chars.get(position) {
            Some(&ch) if ch == expected => position += 1,
            _ => return false,
        }
    }
    true
}

impl TextPosition {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            endings: EndingStack::new(),
            errors: Vec::new(),
            depth: 0,
            max_depth: super::factory::MAX_FORMULA_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// No more text, or a live ending is next
    pub fn finished(&self) -> bool {
        if self.at_end() {
            return true;
        }
        self.endings
            .find(|marker| matches_at(&self.chars, self.index, marker))
            .is_some()
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    pub fn current(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    pub fn checkfor(&self, text: &str) -> bool {
        matches_at(&self.chars, self.index, text)
    }

    pub fn skip(&mut self, text: &str) {
        self.index = (self.index + text.chars().count()).min(self.chars.len());
    }

    /// Consume one character
    pub fn skip_current(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.index += 1;
        Some(ch)
    }

    /// Consume `text` if it is next
    pub fn check_skip(&mut self, text: &str) -> bool {
        if self.checkfor(text) {
            self.skip(text);
            true
        } else {
            false
        }
    }

    /// Consume characters while `accept` holds and the position is not finished
    pub fn glob<F>(&mut self, accept: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut globbed = String::new();
        while !self.finished() {
            match self.current() {
                Some(ch) if accept(ch) => {
                    globbed.push(ch);
                    self.index += 1;
                }
                _ => break,
            }
        }
        globbed
    }

    pub fn glob_alpha(&mut self) -> String {
        self.glob(char::is_alphabetic)
    }

    pub fn glob_digits(&mut self) -> String {
        self.glob(|ch| ch.is_ascii_digit())
    }

    pub fn skip_space(&mut self) -> String {
        self.glob(char::is_whitespace)
    }

    pub fn push_ending(&mut self, marker: impl Into<String>, optional: bool) {
        self.endings.push(marker, optional);
    }

    /// Close the innermost scope whose ending is next, consuming the ending
    ///
    /// Returns the consumed marker, or an empty string when the expected ending was
    /// not found; the problem is recorded as an error either way.
    pub fn pop_ending(&mut self, expected: &str) -> String {
        let chars = &self.chars;
        let index = self.index;
        let popped = self
            .endings
            .pop_until(|marker| matches_at(chars, index, marker));
        match popped {
            Ok(ending) => {
                if ending.marker != expected {
                    self.error(format!(
                        "Expected ending {}, got {}",
                        expected, ending.marker
                    ));
                }
                self.skip(&ending.marker);
                ending.marker
            }
            Err(EndingError::RequiredLeftOpen { required }) => {
                self.error(format!("Missing ending {}", required));
                String::new()
            }
            Err(EndingError::Empty) => {
                self.error(format!("Missing ending {}", expected));
                String::new()
            }
        }
    }

    /// Drop the innermost ending without consuming anything
    pub fn discard_ending(&mut self) {
        self.endings.discard();
    }

    pub fn pending_endings(&self) -> usize {
        self.endings.len()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = format!("{} at {}", message.into(), self.identifier());
        self.errors.push(message);
    }

    /// A short excerpt of the text at the position, for messages
    pub fn identifier(&self) -> String {
        let excerpt: String = self.chars[self.index.min(self.chars.len())..]
            .iter()
            .take(15)
            .collect();
        if excerpt.is_empty() {
            "end of formula".to_string()
        } else {
            format!("\"{}\"", excerpt)
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }
}
