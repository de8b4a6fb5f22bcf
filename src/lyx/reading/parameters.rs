//! Parameter lines
//!
//! Insets open with a block of `key value` lines (`LatexCommand ref`,
//! `reference "sec:intro"`, `\tfilename figure.png`), and tables describe their
//! structure with one-line XML tags (`<cell alignment="center" multicolumn="1">`).
//! Both are tokenized by the same logos lexer.

use crate::lyx::ast::ParameterValue;
use logos::Logos;
use std::collections::BTreeMap;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
pub enum ParameterToken {
    #[token("<")]
    Open,

    #[token(">")]
    Close,

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, unquote)]
    Quoted(String),

    #[regex(r#"[^ \t"<>=]+"#, |lex| lex.slice().to_string())]
    Word(String),
}

fn unquote(lex: &mut logos::Lexer<ParameterToken>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

/// Parse a `key value` line
///
/// A key alone is a flag. A quoted value is unquoted; anything else is the rest of the
/// line, trimmed. Lines that do not start with a key yield nothing.
pub fn parse_key_value(line: &str) -> Option<(String, ParameterValue)> {
    let trimmed = line.trim();
    let mut lexer = ParameterToken::lexer(trimmed);
    let key = match lexer.next() {
        Some(Ok(ParameterToken::Word(word))) => word,
        _ => return None,
    };
    let rest = trimmed[lexer.span().end..].trim();
    if rest.is_empty() {
        return Some((key, ParameterValue::Flag(true)));
    }
    if !rest.contains('"') {
        return Some((key, ParameterValue::Text(rest.to_string())));
    }
    for token in lexer {
        if let Ok(ParameterToken::Quoted(value)) = token {
            return Some((key, ParameterValue::Text(value)));
        }
    }
    // an unbalanced quote keeps whatever follows it
    let value = rest.split('"').nth(1).unwrap_or_default();
    Some((key, ParameterValue::Text(value.to_string())))
}

/// A one-line XML tag with its attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlTag {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    /// Malformed parts that were recovered from
    pub problems: Vec<String>,
}

/// Parse `<name attr="value" ...>`
///
/// An attribute without a value is recorded with the value `"0"` and reported as a
/// problem, as is a tag that is never closed.
pub fn parse_xml_tag(line: &str) -> XmlTag {
    let trimmed = line.trim();
    let mut tag = XmlTag::default();
    let mut tokens = ParameterToken::lexer(trimmed).peekable();

    if tokens.next() != Some(Ok(ParameterToken::Open)) {
        tag.problems
            .push(format!("XML parameter {} should be <...>", trimmed));
    }
    match tokens.next() {
        Some(Ok(ParameterToken::Word(name))) => tag.name = name,
        _ => {
            tag.problems.push(format!("Empty XML parameter {}", trimmed));
            return tag;
        }
    }

    let mut closed = false;
    while let Some(token) = tokens.next() {
        match token {
            Ok(ParameterToken::Word(word)) if word == "/" => {}
            Ok(ParameterToken::Word(attribute)) => {
                if tokens.peek() == Some(&Ok(ParameterToken::Equals)) {
                    tokens.next();
                    match tokens.next() {
                        Some(Ok(ParameterToken::Quoted(value)))
                        | Some(Ok(ParameterToken::Word(value))) => {
                            tag.attributes.insert(attribute, value);
                        }
                        _ => {
                            tag.problems.push(format!(
                                "Missing value for attribute {} in <{}>",
                                attribute, tag.name
                            ));
                            tag.attributes.insert(attribute, "0".to_string());
                        }
                    }
                } else {
                    tag.problems.push(format!(
                        "Erroneous attribute for <{}>: {}",
                        tag.name, attribute
                    ));
                    tag.attributes.insert(attribute, "0".to_string());
                }
            }
            Ok(ParameterToken::Close) => {
                closed = true;
                break;
            }
            _ => tag
                .problems
                .push(format!("Unexpected text in XML parameter {}", trimmed)),
        }
    }
    if !closed {
        tag.problems
            .push(format!("XML parameter {} is not closed", trimmed));
    }
    tag
}
