//! Backslash commands
//!
//! A command is looked up in each category in turn and parsed by the first category
//! that knows it. Unknown commands are kept visible and reported.

use super::arrays;
use super::bits::{BitType, FormulaBit};
use super::factory::FormulaFactory;
use super::position::TextPosition;
use super::tables::{
    ALPHA_COMMANDS, DECORATING_FUNCTIONS, FONT_FUNCTIONS, SYMBOL_COMMANDS, TEXT_FUNCTIONS,
    TWO_PARAMETER_FUNCTIONS,
};
use crate::lyx::ast::escape::escape_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    /// No parameters, fixed output
    Symbol,
    /// No parameters, a letter-like symbol
    Alpha,
    /// One parameter set in a font or in text mode
    Styling,
    /// One parameter with an accent above it
    Decorating,
    /// `\begin{name}` array environments
    Environment,
    Label,
    TwoParameter,
    /// `\sqrt`: an optional index and a parameter
    Hybrid,
}

/// Lookup order of the categories
pub const CATEGORIES: [CommandCategory; 8] = [
    CommandCategory::Symbol,
    CommandCategory::Alpha,
    CommandCategory::Styling,
    CommandCategory::Decorating,
    CommandCategory::Environment,
    CommandCategory::Label,
    CommandCategory::TwoParameter,
    CommandCategory::Hybrid,
];

impl CommandCategory {
    pub fn recognizes(self, command: &str) -> bool {
        match self {
            CommandCategory::Symbol => SYMBOL_COMMANDS.contains_key(command),
            CommandCategory::Alpha => ALPHA_COMMANDS.contains_key(command),
            CommandCategory::Styling => {
                FONT_FUNCTIONS.contains_key(command) || TEXT_FUNCTIONS.contains_key(command)
            }
            CommandCategory::Decorating => DECORATING_FUNCTIONS.contains_key(command),
            CommandCategory::Environment => command == "\\begin",
            CommandCategory::Label => command == "\\label",
            CommandCategory::TwoParameter => TWO_PARAMETER_FUNCTIONS.contains_key(command),
            CommandCategory::Hybrid => command == "\\sqrt",
        }
    }

    fn parse(self, command: &str, factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
        match self {
            CommandCategory::Symbol => parse_symbol(command, pos),
            CommandCategory::Alpha => {
                let html = ALPHA_COMMANDS.get(command).copied().unwrap_or_default();
                FormulaBit::constant(html, command).typed(BitType::Alpha)
            }
            CommandCategory::Styling => parse_styling(command, factory, pos),
            CommandCategory::Decorating => parse_decorating(command, factory, pos),
            CommandCategory::Environment => arrays::parse_environment(command, factory, pos),
            CommandCategory::Label => {
                let key = factory.parse_literal(pos).unwrap_or_default();
                FormulaBit::anchor(&key, format!("{}{{{}}}", command, key))
            }
            CommandCategory::TwoParameter => parse_two_parameters(command, factory, pos),
            CommandCategory::Hybrid => parse_root(command, factory, pos),
        }
    }
}

pub fn category_of(command: &str) -> Option<CommandCategory> {
    CATEGORIES.into_iter().find(|c| c.recognizes(command))
}

/// Read `\name`, or a backslash and one non-letter
pub fn extract_command(pos: &mut TextPosition) -> String {
    let mut command = String::from("\\");
    pos.skip("\\");
    match pos.current() {
        Some(ch) if ch.is_ascii_alphabetic() => {
            command.push_str(&pos.glob(|c| c.is_ascii_alphabetic()));
        }
        Some(ch) => {
            pos.skip_current();
            command.push(ch);
        }
        None => {}
    }
    command
}

pub fn parse_command(factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
    let command = extract_command(pos);
    match category_of(&command) {
        Some(category) => category.parse(&command, factory, pos),
        None => {
            pos.error(format!("Unknown command {}", command));
            let mut unknown = FormulaBit::tagged("span class=\"unknown\"");
            unknown.add(FormulaBit::constant(escape_text(&command), command.as_str()));
            unknown
        }
    }
}

fn parse_symbol(command: &str, pos: &mut TextPosition) -> FormulaBit {
    let html = SYMBOL_COMMANDS.get(command).copied().unwrap_or_default();
    let mut bit = FormulaBit::constant(html, command);
    // \left. and \right. are invisible delimiters
    if (command == "\\left" || command == "\\right") && pos.check_skip(".") {
        bit.add_original(".");
    }
    bit
}

fn parse_styling(command: &str, factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
    if let Some(tag) = TEXT_FUNCTIONS.get(command) {
        let mut bit = FormulaBit::tagged(*tag).typed(BitType::Font);
        bit.add_original(command);
        match factory.parse_literal(pos) {
            Some(text) => bit.add(FormulaBit::constant(
                escape_text(&text),
                format!("{{{}}}", text),
            )),
            None => pos.error(format!("Missing parameter for {}", command)),
        }
        return bit;
    }
    let tag = FONT_FUNCTIONS.get(command).copied().unwrap_or("span");
    let mut bit = FormulaBit::tagged(tag).typed(BitType::Font);
    bit.add_original(command);
    match factory.parse_parameter(pos) {
        Some(parameter) => bit.add(parameter),
        None => pos.error(format!("Missing parameter for {}", command)),
    }
    bit
}

fn parse_decorating(command: &str, factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
    let symbol = DECORATING_FUNCTIONS.get(command).copied().unwrap_or_default();
    let mut bit = FormulaBit::tagged("span class=\"withsymbol\"");
    bit.add_original(command);
    let mut over = FormulaBit::tagged("span class=\"symbolover\"");
    over.add(FormulaBit::constant(symbol, ""));
    bit.add(over);
    let mut under = FormulaBit::tagged("span class=\"undersymbol\"");
    match factory.parse_parameter(pos) {
        Some(parameter) => under.add(parameter),
        None => pos.error(format!("Missing parameter for {}", command)),
    }
    bit.add(under);
    bit
}

fn parse_two_parameters(
    command: &str,
    factory: &FormulaFactory,
    pos: &mut TextPosition,
) -> FormulaBit {
    let (outer, first, second) = TWO_PARAMETER_FUNCTIONS
        .get(command)
        .copied()
        .unwrap_or(("span", "span", "span"));
    let mut bit = FormulaBit::tagged(outer);
    bit.add_original(command);
    for tag in [first, second] {
        let mut wrapper = FormulaBit::tagged(tag);
        match factory.parse_parameter(pos) {
            Some(parameter) => wrapper.add(parameter),
            None => pos.error(format!("Missing parameter for {}", command)),
        }
        bit.add(wrapper);
    }
    bit
}

fn parse_root(command: &str, factory: &FormulaFactory, pos: &mut TextPosition) -> FormulaBit {
    let mut bit = FormulaBit::tagged("span class=\"sqrt\"");
    bit.add_original(command);
    if let Some(index) = factory.parse_square(pos) {
        let mut sup = FormulaBit::tagged("sup class=\"sqrtindex\"");
        sup.add(index);
        bit.add(sup);
    }
    let mut radical = FormulaBit::tagged("span class=\"radical\"");
    radical.add(FormulaBit::constant("√", ""));
    bit.add(radical);
    let mut radicand = FormulaBit::tagged("span class=\"radicand\"");
    match factory.parse_parameter(pos) {
        Some(parameter) => radicand.add(parameter),
        None => pos.error(format!("Missing parameter for {}", command)),
    }
    bit.add(radicand);
    bit
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn render(text: &str) -> (String, Vec<String>) {
        let parsed = FormulaFactory::standard().parse_formula(text);
        (parsed.root.render(), parsed.errors)
    }

    #[rstest]
    #[case("\\alpha", CommandCategory::Alpha)]
    #[case("\\leq", CommandCategory::Symbol)]
    #[case("\\mathbf", CommandCategory::Styling)]
    #[case("\\text", CommandCategory::Styling)]
    #[case("\\hat", CommandCategory::Decorating)]
    #[case("\\begin", CommandCategory::Environment)]
    #[case("\\label", CommandCategory::Label)]
    #[case("\\frac", CommandCategory::TwoParameter)]
    #[case("\\sqrt", CommandCategory::Hybrid)]
    fn test_categories(#[case] command: &str, #[case] category: CommandCategory) {
        assert_eq!(category_of(command), Some(category));
    }

    #[test]
    fn test_fraction() {
        let (html, errors) = render("\\frac{1}{2}");
        assert_eq!(
            html,
            "<span class=\"fraction\"><span class=\"numerator\">1</span><span class=\"denominator\">2</span></span>"
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_parameters_may_follow_whitespace() {
        let (html, _) = render("\\frac 1 2");
        assert!(html.contains("<span class=\"numerator\">1</span>"));
        assert!(html.contains("<span class=\"denominator\">2</span>"));
    }

    #[test]
    fn test_unknown_command() {
        let (html, errors) = render("\\foo");
        assert_eq!(html, "<span class=\"unknown\">\\foo</span>");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Unknown command \\foo"));
    }

    #[test]
    fn test_greek_letters_are_italic() {
        let (html, _) = render("\\alpha+1");
        assert_eq!(html, "<i>α</i> + 1");
    }

    #[test]
    fn test_font_content_is_not_italic() {
        let (html, _) = render("\\mathrm{d}x");
        assert_eq!(html, "<span class=\"mathrm\">d</span><i>x</i>");
    }

    #[test]
    fn test_text_mode_keeps_spaces() {
        let (html, _) = render("\\text{if x > 0}");
        assert_eq!(html, "<span class=\"text\">if x &gt; 0</span>");
    }

    #[test]
    fn test_root_with_index() {
        let (html, errors) = render("\\sqrt[3]{x}");
        assert!(html.starts_with("<span class=\"sqrt\"><sup class=\"sqrtindex\">3</sup>"));
        assert!(html.contains("<span class=\"radicand\"><i>x</i></span>"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_label_anchor() {
        let parsed = FormulaFactory::standard().parse_formula("E=mc^{2}\\label{eq:einstein}");
        assert_eq!(parsed.root.labels(), vec!["eq:einstein".to_string()]);
        assert!(parsed
            .root
            .render()
            .ends_with("<a class=\"eqlabel\" id=\"eq:einstein\"></a>"));
    }

    #[test]
    fn test_non_letter_commands() {
        let (html, errors) = render("a\\,b");
        assert_eq!(html, "<i>a</i>\u{2009}<i>b</i>");
        assert!(errors.is_empty());
    }
}
