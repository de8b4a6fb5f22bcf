//! The finalized document tree
//!
//! Every element of a converted document is a [`Container`]: a [`Kind`] saying what it
//! is, the header tokens and parameters read from its source, and its children in
//! source order. Containers are built once their content is complete and are then
//! rearranged by the postprocessing stages before being rendered.

use crate::lyx::formula::FormulaBit;
use serde::Serialize;
use std::collections::BTreeMap;

/// A parameter read from an inset or a table tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Text(String),
    Flag(bool),
    Attributes(BTreeMap<String, String>),
}

impl ParameterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_attributes(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ParameterValue::Attributes(attributes) => Some(attributes),
            _ => None,
        }
    }

    /// Flags, and the text values LyX writes for booleans
    pub fn is_true(&self) -> bool {
        match self {
            ParameterValue::Flag(flag) => *flag,
            ParameterValue::Text(text) => text == "true" || text == "1",
            ParameterValue::Attributes(_) => false,
        }
    }
}

pub type Parameters = BTreeMap<String, ParameterValue>;

/// An element start tag with its attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagSpec {
    pub tag: String,
    pub class: Option<String>,
    pub style: Option<String>,
    /// Rendered on lines of its own
    pub block: bool,
}

impl TagSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn block(mut self) -> Self {
        self.block = true;
        self
    }
}

/// The role a paragraph layout plays in postprocessing and output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutRole {
    Standard { indented: bool },
    Plain,
    ListItem { ordered: bool },
    Description,
    Code,
    Bibliography,
    /// Titles, headings and every other named layout
    Named,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// The layout name as written, e.g. `Section*`
    pub style: String,
    pub role: LayoutRole,
    pub tag: String,
    pub align: Option<String>,
    pub number: Option<String>,
    pub anchor: Option<String>,
}

impl Layout {
    /// The name without the unnumbered marker
    pub fn base_style(&self) -> &str {
        self.style.trim_end_matches('*')
    }

    pub fn is_starred(&self) -> bool {
        self.style.ends_with('*')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footnote {
    pub number: Option<String>,
    pub margin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Float {
    /// `figure`, `table`, `algorithm` or `listing`
    pub float_type: String,
    pub number: Option<String>,
    pub wrap: bool,
}

/// Whether a cross-reference points at something above or below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub key: String,
    /// Output pattern, `@` for the number and `↕` for the arrow
    pub format: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub keys: Vec<String>,
    pub id: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibEntry {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Formula {
    pub display: bool,
    pub numbered: bool,
    pub number: Option<String>,
    pub root: FormulaBit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// The file named in the source
    pub source: String,
    /// The web-displayable file the page links to
    pub destination: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub colspan: usize,
    pub alignment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Kind {
    /// Source text, escaped
    Text(String),
    /// Text produced by the converter
    Constant(String),
    /// Consumed without output
    Hidden,
    /// Renders its children only
    Group,
    Layout(Layout),
    List { ordered: bool },
    Deeper,
    /// Inline character styling
    Styled(TagSpec),
    /// Any other element rendered as a plain tag around its children
    Tagged(TagSpec),
    LineBreak,
    PageBreak,
    HorizontalRule,
    HorizontalFill,
    AppendixMarker,
    Footnote(Footnote),
    Float(Float),
    Caption,
    Label { key: String },
    Reference(Reference),
    Citation(Citation),
    BibEntry(BibEntry),
    IndexEntry { term: String, anchor: String },
    PrintIndex,
    TableOfContents,
    Include { filename: String },
    Url { target: String, name: Option<String> },
    Listing { inline: bool },
    Formula(Formula),
    Image(Image),
    Table { long: bool },
    Column { alignment: Option<String> },
    Row,
    Cell(Cell),
}

/// A node of the document tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub kind: Kind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Container>,
    pub begin_line: usize,
}

impl Container {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            header: Vec::new(),
            parameters: Parameters::new(),
            children: Vec::new(),
            begin_line: 0,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Kind::Text(text.into()))
    }

    pub fn constant(text: impl Into<String>) -> Self {
        Self::new(Kind::Constant(text.into()))
    }

    pub fn with_children(mut self, children: Vec<Container>) -> Self {
        self.children = children;
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.begin_line = line;
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&ParameterValue> {
        self.parameters.get(key)
    }

    pub fn parameter_text(&self, key: &str) -> Option<&str> {
        self.parameter(key).and_then(ParameterValue::as_text)
    }

    pub fn layout(&self) -> Option<&Layout> {
        match &self.kind {
            Kind::Layout(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn layout_mut(&mut self) -> Option<&mut Layout> {
        match &mut self.kind {
            Kind::Layout(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn has_role(&self, role: LayoutRole) -> bool {
        self.layout().is_some_and(|l| l.role == role)
    }

    /// The concatenated text of all leaves
    pub fn plain_text(&self) -> String {
        match &self.kind {
            Kind::Text(text) | Kind::Constant(text) => text.clone(),
            Kind::Hidden => String::new(),
            Kind::Formula(formula) => formula.root.original.clone(),
            _ => self.children.iter().map(Container::plain_text).collect(),
        }
    }

    /// All descendants accepted by `pred`, in document order
    pub fn find_all(&self, pred: &dyn Fn(&Container) -> bool) -> Vec<&Container> {
        let mut found = Vec::new();
        for child in &self.children {
            if pred(child) {
                found.push(child);
            }
            found.extend(child.find_all(pred));
        }
        found
    }

    /// The first descendant accepted by `pred`, in document order
    pub fn find_first_mut(
        &mut self,
        pred: &dyn Fn(&Container) -> bool,
    ) -> Option<&mut Container> {
        for child in self.children.iter_mut() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_first_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Remove every descendant accepted by `pred` and return them
    pub fn extract_all(&mut self, pred: &dyn Fn(&Container) -> bool) -> Vec<Container> {
        let mut extracted = Vec::new();
        for mut child in std::mem::take(&mut self.children) {
            if pred(&child) {
                extracted.push(child);
            } else {
                extracted.extend(child.extract_all(pred));
                self.children.push(child);
            }
        }
        extracted
    }

    /// Label keys declared anywhere inside, including formula labels
    pub fn label_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.collect_labels(&mut keys);
        keys
    }

    fn collect_labels(&self, keys: &mut Vec<String>) {
        match &self.kind {
            Kind::Label { key } => keys.push(key.clone()),
            Kind::Formula(formula) => keys.extend(formula.root.labels()),
            _ => {}
        }
        for child in &self.children {
            child.collect_labels(keys);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> Container {
        Container::new(Kind::Layout(Layout {
            style: "Standard".to_string(),
            role: LayoutRole::Standard { indented: false },
            tag: "div".to_string(),
            align: None,
            number: None,
            anchor: None,
        }))
        .with_children(vec![Container::text(text)])
    }

    #[test]
    fn test_plain_text_skips_hidden() {
        let mut node = paragraph("Hello ");
        node.children.push(Container::new(Kind::Hidden));
        node.children.push(Container::constant("world"));
        assert_eq!(node.plain_text(), "Hello world");
    }

    #[test]
    fn test_extract_all_is_recursive() {
        let mut caption = Container::new(Kind::Caption).with_children(vec![
            Container::new(Kind::Label {
                key: "fig:a".to_string(),
            }),
            Container::text("A plot"),
        ]);
        caption.children.push(
            Container::new(Kind::Group).with_children(vec![Container::new(Kind::Label {
                key: "fig:b".to_string(),
            })]),
        );

        let labels = caption.extract_all(&|c| matches!(c.kind, Kind::Label { .. }));
        assert_eq!(labels.len(), 2);
        assert_eq!(caption.plain_text(), "A plot");
        assert!(caption.label_keys().is_empty());
    }

    #[test]
    fn test_find_first_mut() {
        let mut root = Container::new(Kind::Group).with_children(vec![paragraph("one")]);
        let found = root.find_first_mut(&|c| matches!(c.kind, Kind::Text(_)));
        assert!(found.is_some());
        if let Some(text) = found {
            text.kind = Kind::Text("uno".to_string());
        }
        assert_eq!(root.plain_text(), "uno");
    }

    #[test]
    fn test_parameter_truthiness() {
        assert!(ParameterValue::Text("true".to_string()).is_true());
        assert!(ParameterValue::Flag(true).is_true());
        assert!(!ParameterValue::Text("false".to_string()).is_true());
    }
}
