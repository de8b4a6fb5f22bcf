//! Recognizers and the factory that dispatches between them
//!
//! A formula is parsed by repeatedly asking the factory for the next bit. The factory
//! tries its recognizers in order and lets the first one that detects the current
//! character parse it. Recognizers that need sub-formulas call back into the factory,
//! so brackets, scripts, and command parameters nest naturally.

use super::bits::{BitType, FormulaBit};
use super::commands;
use super::position::TextPosition;
use super::tables::SYMBOL_CHARS;
use crate::lyx::ast::escape::escape_text;
use once_cell::sync::Lazy;

/// Deepest nesting of sub-formulas before the rest is taken literally
pub const MAX_FORMULA_DEPTH: usize = 64;

/// Detects and parses one kind of formula bit
pub trait Recognizer: Send + Sync {
    fn detect(&self, pos: &TextPosition) -> bool;
    fn parse(&self, factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit;
}

/// Single characters from the symbol table
pub struct SymbolRecognizer;

impl Recognizer for SymbolRecognizer {
    fn detect(&self, pos: &TextPosition) -> bool {
        pos.current().is_some_and(|ch| SYMBOL_CHARS.contains_key(&ch))
    }

    fn parse(&self, _factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
        let ch = pos.skip_current().unwrap_or(' ');
        let html = SYMBOL_CHARS.get(&ch).copied().unwrap_or_default();
        FormulaBit::constant(html, ch.to_string())
    }
}

/// Runs of letters
pub struct RawTextRecognizer;

impl Recognizer for RawTextRecognizer {
    fn detect(&self, pos: &TextPosition) -> bool {
        pos.current().is_some_and(char::is_alphabetic)
    }

    fn parse(&self, _factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
        let letters = pos.glob_alpha();
        FormulaBit::constant(escape_text(&letters), letters).typed(BitType::Alpha)
    }
}

/// Runs of digits
pub struct NumberRecognizer;

impl Recognizer for NumberRecognizer {
    fn detect(&self, pos: &TextPosition) -> bool {
        pos.current().is_some_and(|ch| ch.is_ascii_digit())
    }

    fn parse(&self, _factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
        let digits = pos.glob_digits();
        FormulaBit::constant(digits.clone(), digits).typed(BitType::Number)
    }
}

/// `{...}` groups
pub struct BracketRecognizer;

impl Recognizer for BracketRecognizer {
    fn detect(&self, pos: &TextPosition) -> bool {
        pos.checkfor("{")
    }

    fn parse(&self, factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
        factory.parse_bracket(pos, "{", "}")
    }
}

/// Backslash commands
pub struct CommandRecognizer;

impl Recognizer for CommandRecognizer {
    fn detect(&self, pos: &TextPosition) -> bool {
        pos.checkfor("\\")
    }

    fn parse(&self, factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
        commands::parse_command(factory, pos)
    }
}

/// `^` superscripts and `_` subscripts
pub struct ScriptRecognizer;

impl Recognizer for ScriptRecognizer {
    fn detect(&self, pos: &TextPosition) -> bool {
        pos.checkfor("^") || pos.checkfor("_")
    }

    fn parse(&self, factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
        let marker = pos.skip_current().unwrap_or('^');
        let mut bit = FormulaBit::tagged(if marker == '^' { "sup" } else { "sub" });
        bit.add_original(&marker.to_string());
        match factory.parse_parameter(pos) {
            Some(parameter) => bit.add(parameter),
            None => pos.error(format!("Missing parameter for {}", marker)),
        }
        bit
    }
}

/// `%` comments to the end of the line
///
/// Not installed by default; add it with [`FormulaFactory::with_ignored`].
pub struct CommentRecognizer;

impl Recognizer for CommentRecognizer {
    fn detect(&self, pos: &TextPosition) -> bool {
        pos.checkfor("%")
    }

    fn parse(&self, _factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
        let comment = pos.glob(|ch| ch != '\n');
        pos.check_skip("\n");
        FormulaBit::constant("", comment)
    }
}

/// Parses formulas with an ordered list of recognizers
pub struct FormulaFactory {
    recognizers: Vec<Box<dyn Recognizer>>,
    ignored: Vec<Box<dyn Recognizer>>,
}

/// The result of parsing a whole formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFormula {
    pub root: FormulaBit,
    pub errors: Vec<String>,
}

static STANDARD: Lazy<FormulaFactory> = Lazy::new(FormulaFactory::new);

impl FormulaFactory {
    pub fn new() -> Self {
        Self {
            recognizers: vec![
                Box::new(SymbolRecognizer),
                Box::new(RawTextRecognizer),
                Box::new(NumberRecognizer),
                Box::new(BracketRecognizer),
                Box::new(CommandRecognizer),
                Box::new(ScriptRecognizer),
            ],
            ignored: Vec::new(),
        }
    }

    /// The shared factory with the standard recognizers
    pub fn standard() -> &'static FormulaFactory {
        &STANDARD
    }

    /// Skip bits matched by `recognizer` wherever a bit may start
    pub fn with_ignored(mut self, recognizer: impl Recognizer + 'static) -> Self {
        self.ignored.push(Box::new(recognizer));
        self
    }

    fn clear_ignored(&self, pos: &mut TextPosition) {
        'outer: while !pos.finished() {
            for recognizer in &self.ignored {
                if recognizer.detect(pos) {
                    recognizer.parse(self, pos);
                    continue 'outer;
                }
            }
            break;
        }
    }

    /// Some recognizer can parse at the position
    pub fn detect_any(&self, pos: &mut TextPosition) -> bool {
        self.clear_ignored(pos);
        !pos.finished() && self.recognizers.iter().any(|r| r.detect(pos))
    }

    /// Parse the next bit
    ///
    /// A character no recognizer accepts is reported and copied escaped.
    pub fn parse_any(&self, pos: &mut TextPosition) -> FormulaBit {
        self.clear_ignored(pos);
        if pos.finished() {
            return FormulaBit::contents();
        }
        if pos.depth >= pos.max_depth {
            pos.error("Formula nested too deeply");
            let ch = pos.skip_current().map(String::from).unwrap_or_default();
            return FormulaBit::constant(escape_text(&ch), ch);
        }
        for recognizer in &self.recognizers {
            if recognizer.detect(pos) {
                pos.depth += 1;
                let bit = recognizer.parse(self, pos);
                pos.depth -= 1;
                return bit;
            }
        }
        pos.error("Unrecognized formula");
        let ch = pos.skip_current().map(String::from).unwrap_or_default();
        FormulaBit::constant(escape_text(&ch), ch)
    }

    /// Parse bits until the position is finished
    pub fn parse_whole(&self, pos: &mut TextPosition) -> FormulaBit {
        let mut whole = FormulaBit::contents();
        while !pos.finished() {
            let bit = self.parse_any(pos);
            whole.add(bit);
        }
        whole
    }

    /// Parse a complete formula source
    pub fn parse_formula(&self, text: &str) -> ParsedFormula {
        self.parse_formula_limited(text, MAX_FORMULA_DEPTH)
    }

    /// Parse a complete formula source, descending at most `max_depth` bits
    pub fn parse_formula_limited(&self, text: &str, max_depth: usize) -> ParsedFormula {
        let mut pos = TextPosition::new(text).with_max_depth(max_depth);
        let mut root = self.parse_whole(&mut pos);
        if pos.pending_endings() > 0 {
            pos.error("Formula left scopes open");
        }
        root.italicize();
        ParsedFormula {
            root,
            errors: pos.take_errors(),
        }
    }

    /// Parse a delimited group as formula content
    pub fn parse_bracket(&self, pos: &mut TextPosition, start: &str, end: &str) -> FormulaBit {
        let mut bracket = FormulaBit::contents();
        if !pos.check_skip(start) {
            pos.error(format!("Missing {}", start));
            return bracket;
        }
        bracket.add_original(start);
        pos.push_ending(end, false);
        while !pos.finished() {
            let bit = self.parse_any(pos);
            bracket.add(bit);
        }
        let ending = pos.pop_ending(end);
        bracket.add_original(&ending);
        bracket
    }

    /// Read a delimited group as literal text, keeping nested groups
    pub fn parse_literal_bracket(&self, pos: &mut TextPosition, start: &str, end: &str) -> String {
        if !pos.check_skip(start) {
            return String::new();
        }
        pos.push_ending(end, false);
        let mut literal = String::new();
        while !pos.finished() {
            if pos.checkfor(start) {
                let inner = self.parse_literal_bracket(pos, start, end);
                literal.push_str(start);
                literal.push_str(&inner);
                literal.push_str(end);
            } else if let Some(ch) = pos.skip_current() {
                literal.push(ch);
            }
        }
        pos.pop_ending(end);
        literal
    }

    /// The parameter of a command or script: one bit, after optional whitespace
    pub fn parse_parameter(&self, pos: &mut TextPosition) -> Option<FormulaBit> {
        let space = pos.skip_space();
        if !self.detect_any(pos) {
            return None;
        }
        let mut bit = self.parse_any(pos);
        bit.original.insert_str(0, &space);
        Some(bit)
    }

    /// An optional `[...]` parameter
    pub fn parse_square(&self, pos: &mut TextPosition) -> Option<FormulaBit> {
        pos.skip_space();
        if !pos.checkfor("[") {
            return None;
        }
        Some(self.parse_bracket(pos, "[", "]"))
    }

    /// A literal parameter: `{text}` or a run of letters and digits
    pub fn parse_literal(&self, pos: &mut TextPosition) -> Option<String> {
        pos.skip_space();
        if pos.checkfor("{") {
            return Some(self.parse_literal_bracket(pos, "{", "}"));
        }
        let value = pos.glob(char::is_alphanumeric);
        if value.is_empty() {
            pos.error("Missing literal parameter");
            None
        } else {
            Some(value)
        }
    }
}

impl Default for FormulaFactory {
    fn default() -> Self {
        Self::new()
    }
}
