//! Output formats
//!
//! A [`Format`] turns a postprocessed [`Document`] into text. The converter ships two:
//! [`html::HtmlFormat`], the page a reader sees, and [`json::JsonFormat`], a dump of
//! the tree used for debugging the grammar. Formats are looked up by name in a
//! [`FormatRegistry`].

pub mod html;
pub mod json;

use crate::lyx::transforms::Document;
use std::collections::HashMap;
use thiserror::Error;

pub use html::HtmlFormat;
pub use json::JsonFormat;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// A way of writing a document out
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "html", "json")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError>;
}

/// Formats by name
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format, replacing any format of the same name
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// All format names, sorted
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        self.get(format)?.serialize(doc)
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HtmlFormat);
        registry.register(JsonFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
