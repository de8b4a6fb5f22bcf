//! Recursive descent over the lines of a LyX source
//!
//! Every node goes through the same steps: the registry picks its type from the current
//! line, the node's [`ParseStyle`] reads its header, parameters and children, and the
//! finished [`ParsedNode`] is handed to [`process_node`] which turns it into a
//! [`Container`]. Children are always finalized before their parent, so process hooks
//! only ever see complete subtrees.
//!
//! The parser never aborts on malformed input. Missing endings, unknown lines and
//! excessive nesting are reported to the document's diagnostics and parsing goes on;
//! the only error returned is running past the end of the input while a read that
//! cannot stop early is in progress.

use super::node_type::{NodeType, ParseStyle, INSET_ENDING, LAYOUT_ENDING};
use super::process::process_node;
use super::registry::NodeTypeRegistry;
use crate::lyx::ast::{Container, Kind, ParameterValue, Parameters};
use crate::lyx::context::DocumentContext;
use crate::lyx::endings::EndingStack;
use crate::lyx::error::ParserResult;
use crate::lyx::reading::{parse_key_value, parse_xml_tag, LineCursor};

/// A node whose lines have been read but that has not been finalized yet
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNode {
    pub node_type: NodeType,
    /// Tokens of the opening line
    pub header: Vec<String>,
    pub parameters: Parameters,
    pub children: Vec<Container>,
    /// Raw lines, for text leaves, formulas and the document header
    pub lines: Vec<String>,
    pub begin_line: usize,
}

impl ParsedNode {
    pub fn new(node_type: NodeType, begin_line: usize) -> Self {
        Self {
            node_type,
            header: Vec::new(),
            parameters: Parameters::new(),
            children: Vec::new(),
            lines: Vec::new(),
            begin_line,
        }
    }

    /// The header tokens after the command, joined by spaces
    pub fn header_rest(&self, skip: usize) -> String {
        self.header
            .iter()
            .skip(skip)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn parameter_text(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(ParameterValue::as_text)
    }
}

/// Header blocks whose content is not interpreted
const HEADER_BLOCKS: &[(&str, &str)] = &[("\\branch", "\\end_branch"), ("\\index", "\\end_index")];

pub struct ContainerParser<'a> {
    cursor: LineCursor,
    registry: &'a NodeTypeRegistry,
    /// Endings of the open text runs, shared by every run of a paragraph
    text_endings: EndingStack,
    depth: usize,
    ctx: &'a mut DocumentContext,
}

impl<'a> ContainerParser<'a> {
    pub fn new(source: &str, ctx: &'a mut DocumentContext) -> Self {
        Self::with_registry(source, NodeTypeRegistry::standard(), ctx)
    }

    pub fn with_registry(
        source: &str,
        registry: &'a NodeTypeRegistry,
        ctx: &'a mut DocumentContext,
    ) -> Self {
        Self {
            cursor: LineCursor::new(source),
            registry,
            text_endings: EndingStack::new(),
            depth: 0,
            ctx,
        }
    }

    /// Parse the whole source into one root group
    pub fn parse_document(mut self) -> ParserResult<Container> {
        let mut children = Vec::new();
        while !self.cursor.at_end() {
            if let Some(child) = self.parse_child()? {
                children.push(child);
            }
        }
        Ok(Container::new(Kind::Group)
            .with_children(children)
            .at_line(1))
    }

    /// Parse the node at the current line; blank lines are skipped
    fn parse_child(&mut self) -> ParserResult<Option<Container>> {
        if self.cursor.is_blank() {
            self.cursor.advance()?;
            return Ok(None);
        }
        self.parse_node().map(Some)
    }

    fn parse_node(&mut self) -> ParserResult<Container> {
        let line = self.cursor.line_number();
        let mut node_type = self.registry.lookup(self.cursor.current_tokens());
        log::debug!("line {}: {:?}", line, node_type);

        if self.depth >= self.ctx.options.max_nesting && node_type != NodeType::Text {
            self.ctx.diagnostics.warning(
                line,
                "nesting-depth",
                format!(
                    "Nesting deeper than {} levels, kept as text",
                    self.ctx.options.max_nesting
                ),
            );
            node_type = NodeType::Text;
        }

        self.depth += 1;
        let parsed = self.parse_with_style(node_type, line);
        self.depth -= 1;
        Ok(process_node(parsed?, self.ctx))
    }

    fn parse_with_style(&mut self, node_type: NodeType, line: usize) -> ParserResult<ParsedNode> {
        let mut node = ParsedNode::new(node_type, line);
        match node_type.parse_style() {
            ParseStyle::Leaf => {
                node.lines.push(self.cursor.current().to_string());
                self.cursor.advance()?;
            }
            ParseStyle::LoneCommand => {
                self.read_header(&mut node);
                self.cursor.advance()?;
            }
            ParseStyle::XmlLoneCommand => {
                self.read_xml_header(&mut node);
                self.cursor.advance()?;
            }
            ParseStyle::Bounded(ending) => {
                self.read_header(&mut node);
                self.cursor.advance()?;
                if self.parse_until(ending, &mut node)? {
                    self.cursor.advance()?;
                }
            }
            ParseStyle::Excluding(ending) => {
                self.read_header(&mut node);
                self.cursor.advance()?;
                self.parse_until(ending, &mut node)?;
            }
            ParseStyle::XmlBounded(ending) => {
                self.read_xml_header(&mut node);
                self.cursor.advance()?;
                if self.parse_until(ending, &mut node)? {
                    self.cursor.advance()?;
                }
            }
            ParseStyle::Inset => {
                self.read_header(&mut node);
                self.cursor.advance()?;
                self.read_parameters(&mut node)?;
                if self.parse_until(INSET_ENDING, &mut node)? {
                    self.cursor.advance()?;
                }
            }
            ParseStyle::TextRun(ending) => {
                self.read_header(&mut node);
                self.cursor.advance()?;
                self.parse_text_run(ending, &mut node)?;
            }
            ParseStyle::Dummy(ending) => {
                self.read_header(&mut node);
                self.skip_through(ending, &node)?;
            }
            ParseStyle::Formula => self.read_formula(&mut node)?,
            ParseStyle::Table => self.read_table(&mut node)?,
            ParseStyle::Header => self.read_document_header(&mut node)?,
        }
        Ok(node)
    }

    fn read_header(&self, node: &mut ParsedNode) {
        node.header = self.cursor.current_tokens().to_vec();
    }

    /// Read an XML tag line; attributes become text parameters
    fn read_xml_header(&mut self, node: &mut ParsedNode) {
        let tag = parse_xml_tag(self.cursor.current());
        node.header = vec![format!("<{}", tag.name)];
        for problem in tag.problems {
            self.ctx
                .diagnostics
                .warning(node.begin_line, "table", problem);
        }
        for (key, value) in tag.attributes {
            node.parameters.insert(key, ParameterValue::Text(value));
        }
    }

    /// Parameter lines up to the first command or blank line
    fn read_parameters(&mut self, node: &mut ParsedNode) -> ParserResult<()> {
        while !self.cursor.at_end() {
            let line = self.cursor.current().trim();
            if line.is_empty() || line.starts_with('\\') {
                break;
            }
            if line.starts_with('<') {
                let tag = parse_xml_tag(line);
                node.parameters
                    .insert(tag.name.clone(), ParameterValue::Attributes(tag.attributes));
            } else if let Some((key, value)) = parse_key_value(line) {
                node.parameters.insert(key, value);
            }
            self.cursor.advance()?;
        }
        Ok(())
    }

    /// Parse children until a line starting with `ending`, which is left unconsumed
    ///
    /// Returns false when the input ran out first.
    fn parse_until(&mut self, ending: &str, node: &mut ParsedNode) -> ParserResult<bool> {
        loop {
            if self.cursor.at_end() {
                self.missing_ending(ending, node);
                return Ok(false);
            }
            if self.cursor.current().trim_start().starts_with(ending) {
                return Ok(true);
            }
            if let Some(child) = self.parse_child()? {
                node.children.push(child);
            }
        }
    }

    fn parse_text_run(&mut self, ending: &str, node: &mut ParsedNode) -> ParserResult<()> {
        self.text_endings.push(ending, false);
        let mut endings: Vec<String> = self.text_endings.markers().map(str::to_string).collect();
        endings.push(LAYOUT_ENDING.to_string());
        endings.push(INSET_ENDING.to_string());

        loop {
            if self.cursor.at_end() {
                self.missing_ending(ending, node);
                self.text_endings.clear();
                return Ok(());
            }
            if self.cursor.is_blank() {
                self.cursor.advance()?;
                continue;
            }
            if self.text_run_ends(&endings) {
                return Ok(());
            }
            if let Some(child) = self.parse_child()? {
                node.children.push(child);
            }
        }
    }

    /// The first token closes the run when it is one of the run's endings
    ///
    /// A closing token still pending in the shared stack is removed from it; any other
    /// closing token ends every run that is open.
    fn text_run_ends(&mut self, endings: &[String]) -> bool {
        let first = match self.cursor.current_tokens().first() {
            Some(first) => first.clone(),
            None => return false,
        };
        if !endings.contains(&first) {
            return false;
        }
        if !self.text_endings.remove(&first) {
            self.text_endings.clear();
        }
        true
    }

    /// Skip lines up to and including the one starting with `ending`
    fn skip_through(&mut self, ending: &str, node: &ParsedNode) -> ParserResult<()> {
        self.cursor.advance()?;
        while !self.cursor.at_end() {
            let found = self.cursor.current().trim_start().starts_with(ending);
            self.cursor.advance()?;
            if found {
                return Ok(());
            }
        }
        self.missing_ending(ending, node);
        Ok(())
    }

    /// The formula text: the rest of the opening line and every line up to `\end_inset`
    fn read_formula(&mut self, node: &mut ParsedNode) -> ParserResult<()> {
        self.read_header(node);
        let first = self.cursor.current().trim_start();
        let rest = first
            .strip_prefix("\\begin_inset")
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix("Formula"))
            .unwrap_or("")
            .trim();
        if !rest.is_empty() {
            node.lines.push(rest.to_string());
        }
        self.cursor.advance()?;
        loop {
            if self.cursor.at_end() {
                self.missing_ending(INSET_ENDING, node);
                return Ok(());
            }
            if self.cursor.current().trim_start().starts_with(INSET_ENDING) {
                return self.cursor.advance();
            }
            node.lines.push(self.cursor.current().to_string());
            self.cursor.advance()?;
        }
    }

    /// Table parameters from the `<lyxtabular>` and `<features>` lines, then the rows
    fn read_table(&mut self, node: &mut ParsedNode) -> ParserResult<()> {
        self.read_header(node);
        self.cursor.advance()?;
        while !self.cursor.at_end() {
            let line = self.cursor.current().trim_start();
            if !(line.starts_with("<lyxtabular") || line.starts_with("<features")) {
                break;
            }
            let tag = parse_xml_tag(line);
            for problem in &tag.problems {
                self.ctx
                    .diagnostics
                    .warning(self.cursor.line_number(), "table", problem.clone());
            }
            node.parameters
                .insert(tag.name, ParameterValue::Attributes(tag.attributes));
            self.cursor.advance()?;
        }
        if self.parse_until(INSET_ENDING, node)? {
            self.cursor.advance()?;
        }
        Ok(())
    }

    /// `\key value` settings until `\end_header`, skipping nested blocks
    fn read_document_header(&mut self, node: &mut ParsedNode) -> ParserResult<()> {
        const ENDING: &str = "\\end_header";
        self.read_header(node);
        self.cursor.advance()?;
        loop {
            if self.cursor.at_end() {
                self.missing_ending(ENDING, node);
                return Ok(());
            }
            let line = self.cursor.current().trim().to_string();
            if line.starts_with(ENDING) {
                return self.cursor.advance();
            }
            if let Some(block_end) = header_block_end(&line) {
                self.read_header_block(&line, &block_end, node)?;
                continue;
            }
            if let Some(setting) = line.strip_prefix('\\') {
                let (key, value) = setting.split_once(' ').unwrap_or((setting, ""));
                node.parameters
                    .insert(key.to_string(), ParameterValue::Text(value.trim().to_string()));
            }
            node.lines.push(line);
            self.cursor.advance()?;
        }
    }

    /// Skip a nested header block; branch blocks record whether they are selected
    fn read_header_block(
        &mut self,
        opening: &str,
        block_end: &str,
        node: &mut ParsedNode,
    ) -> ParserResult<()> {
        let branch = opening
            .strip_prefix("\\branch ")
            .map(|name| name.trim().to_string());
        self.cursor.advance()?;
        while !self.cursor.at_end() {
            let line = self.cursor.current().trim().to_string();
            self.cursor.advance()?;
            if line.starts_with(block_end) {
                return Ok(());
            }
            if let (Some(name), Some(selected)) = (&branch, line.strip_prefix("\\selected ")) {
                node.parameters.insert(
                    format!("branch:{}", name),
                    ParameterValue::Text(selected.trim().to_string()),
                );
            }
        }
        self.missing_ending(block_end, node);
        Ok(())
    }

    fn missing_ending(&mut self, ending: &str, node: &ParsedNode) {
        self.ctx.diagnostics.error(
            node.begin_line,
            "missing-ending",
            format!("Missing {} for {}", ending, node.header_rest(0)),
        );
    }
}

/// The closing command of a nested header block opened by `line`, if any
fn header_block_end(line: &str) -> Option<String> {
    let command = line.split_whitespace().next()?;
    if let Some(name) = command.strip_prefix("\\begin_") {
        return Some(format!("\\end_{}", name));
    }
    HEADER_BLOCKS
        .iter()
        .find(|(start, _)| command == *start)
        .map(|(_, end)| end.to_string())
}
