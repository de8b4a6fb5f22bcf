//! The stages of a conversion
//!
//! Each step implements [`ConversionStep`]. Parsing fails only when a required read runs
//! past the last line; a missing closing marker is a diagnostic. The later stages
//! cannot fail on any tree the parser produced, except for a format failing to
//! serialize.

use super::{Conversion, ConversionStep, Document, TransformError};
use crate::lyx::assembling::Postprocessor;
use crate::lyx::formats::{Format, HtmlFormat};
use crate::lyx::parsing::{ContainerParser, NodeTypeRegistry};

/// Source lines to a tree of finalized containers
pub struct Parsing {
    registry: &'static NodeTypeRegistry,
}

impl Parsing {
    pub fn new() -> Self {
        Self::with_registry(NodeTypeRegistry::standard())
    }

    /// Parse with a registry built for the purpose, typically a `Lazy` static
    pub fn with_registry(registry: &'static NodeTypeRegistry) -> Self {
        Self { registry }
    }
}

impl Default for Parsing {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionStep<Conversion, Document> for Parsing {
    fn name(&self) -> &'static str {
        "parsing"
    }

    fn apply(&self, input: Conversion) -> Result<Document, TransformError> {
        let Conversion {
            source,
            mut context,
        } = input;
        let root = ContainerParser::with_registry(&source, self.registry, &mut context)
            .parse_document()
            .map_err(|e| TransformError::new(self.name(), e.to_string()))?;
        log::debug!(
            "parsed {} top-level nodes, {} diagnostics",
            root.children.len(),
            context.diagnostics.len()
        );
        Ok(Document { root, context })
    }
}

/// Numbering, grouping and reference checks
pub struct Postprocessing {
    postprocessor: Postprocessor,
}

impl Postprocessing {
    pub fn new() -> Self {
        Self {
            postprocessor: Postprocessor::standard(),
        }
    }
}

impl Default for Postprocessing {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionStep<Document, Document> for Postprocessing {
    fn name(&self) -> &'static str {
        "postprocessing"
    }

    fn apply(&self, input: Document) -> Result<Document, TransformError> {
        let Document { root, mut context } = input;
        let root = self.postprocessor.postprocess(root, &mut context);
        Ok(Document { root, context })
    }
}

/// The document as an HTML page, or its body in raw mode
#[derive(Default)]
pub struct HtmlRendering;

impl ConversionStep<Document, String> for HtmlRendering {
    fn name(&self) -> &'static str {
        "html"
    }

    fn apply(&self, input: Document) -> Result<String, TransformError> {
        HtmlFormat
            .serialize(&input)
            .map_err(|e| TransformError::new(self.name(), e.to_string()))
    }
}
