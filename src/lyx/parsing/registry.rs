//! Dispatch from a line's leading tokens to a node type
//!
//! Start sequences are stored in a trie of whitespace-separated words. A line is
//! matched by walking the trie along its tokens as far as possible and then backing
//! up to the deepest node that carries a type, so `\begin_inset Flex URL` wins over
//! `\begin_inset Flex`, which wins over `\begin_inset`. The root carries the
//! catch-all type used for plain text.

use super::node_type::{NodeType, STARTS};
use crate::lyx::error::RegistryError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct TrieNode {
    node_type: Option<NodeType>,
    branches: HashMap<String, TrieNode>,
}

#[derive(Debug)]
pub struct NodeTypeRegistry {
    root: TrieNode,
}

static STANDARD: Lazy<NodeTypeRegistry> = Lazy::new(|| {
    let mut registry = NodeTypeRegistry::empty();
    for (start, node_type) in STARTS {
        if let Err(err) = registry.register(start, *node_type) {
            log::error!("{}", err);
        }
    }
    registry
});

/// Tag-like tokens such as `<row>` are matched without their closing bracket
fn normalize(token: &str) -> &str {
    if token.len() > 1 {
        token.strip_suffix('>').unwrap_or(token)
    } else {
        token
    }
}

impl NodeTypeRegistry {
    /// A registry with no starts at all; lookups fall back to text
    pub fn empty() -> Self {
        Self {
            root: TrieNode::default(),
        }
    }

    /// A registry with only the catch-all text type
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.root.node_type = Some(NodeType::Text);
        registry
    }

    /// The shared registry of every standard start sequence
    pub fn standard() -> &'static NodeTypeRegistry {
        &STANDARD
    }

    /// Register a start sequence; the empty sequence sets the catch-all
    pub fn register(&mut self, start: &str, node_type: NodeType) -> Result<(), RegistryError> {
        let mut node = &mut self.root;
        for word in start.split_whitespace() {
            node = node.branches.entry(normalize(word).to_string()).or_default();
        }
        if node.node_type.is_some() && !start.trim().is_empty() {
            return Err(RegistryError::DuplicateStart(start.to_string()));
        }
        node.node_type = Some(node_type);
        Ok(())
    }

    /// The node type for a line's tokens, by longest registered prefix
    pub fn lookup<S: AsRef<str>>(&self, tokens: &[S]) -> NodeType {
        let mut path: Vec<&TrieNode> = vec![&self.root];
        for token in tokens {
            let word = normalize(token.as_ref());
            match path.last().and_then(|node| node.branches.get(word)) {
                Some(next) => path.push(next),
                None => break,
            }
        }
        path.iter()
            .rev()
            .find_map(|node| node.node_type)
            .unwrap_or(NodeType::Text)
    }

    pub fn lookup_line(&self, line: &str) -> NodeType {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        self.lookup(&tokens)
    }
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_longest_prefix_with_backtracking() {
        let mut registry = NodeTypeRegistry::new();
        registry.register("\\color", NodeType::Color).unwrap();
        registry.register("\\color none", NodeType::Hidden).unwrap();

        assert_eq!(registry.lookup_line("\\color none"), NodeType::Hidden);
        assert_eq!(registry.lookup_line("\\color blue"), NodeType::Color);
        assert_eq!(registry.lookup_line("\\color"), NodeType::Color);
        assert_eq!(registry.lookup_line("plain words"), NodeType::Text);
    }

    #[test]
    fn test_backtracks_past_untyped_nodes() {
        let mut registry = NodeTypeRegistry::new();
        registry.register("\\begin_inset", NodeType::UnknownInset).unwrap();
        registry
            .register("\\begin_inset CommandInset ref", NodeType::Reference)
            .unwrap();

        // "CommandInset" alone carries no type
        assert_eq!(
            registry.lookup_line("\\begin_inset CommandInset label"),
            NodeType::UnknownInset
        );
        assert_eq!(
            registry.lookup_line("\\begin_inset CommandInset ref"),
            NodeType::Reference
        );
    }

    #[test]
    fn test_duplicate_start_is_rejected() {
        let mut registry = NodeTypeRegistry::new();
        registry.register("\\emph on", NodeType::Emphasis).unwrap();
        assert_eq!(
            registry.register("\\emph  on", NodeType::Bold),
            Err(RegistryError::DuplicateStart("\\emph  on".to_string()))
        );
    }

    #[test]
    fn test_empty_registry_falls_back_to_text() {
        let registry = NodeTypeRegistry::empty();
        assert_eq!(registry.lookup_line("\\begin_layout Standard"), NodeType::Text);
    }

    #[rstest]
    #[case("\\begin_layout Standard", NodeType::StandardLayout)]
    #[case("\\begin_layout Section", NodeType::Layout)]
    #[case("\\begin_layout Plain Layout", NodeType::PlainLayout)]
    #[case("\\begin_inset Flex URL", NodeType::FlexUrl)]
    #[case("\\begin_inset Flex CharStyle:Code", NodeType::Flex)]
    #[case("\\begin_inset Foo", NodeType::UnknownInset)]
    #[case("\\emph on", NodeType::Emphasis)]
    #[case("\\emph default", NodeType::Hidden)]
    #[case("\\shape italic", NodeType::Shape)]
    #[case("<row>", NodeType::Row)]
    #[case("<cell alignment=\"center\" valignment=\"top\">", NodeType::Cell)]
    #[case("</lyxtabular>", NodeType::Hidden)]
    #[case("Some text", NodeType::Text)]
    #[case("", NodeType::Text)]
    fn test_standard_starts(#[case] line: &str, #[case] expected: NodeType) {
        assert_eq!(NodeTypeRegistry::standard().lookup_line(line), expected);
    }
}
