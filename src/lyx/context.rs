//! Per-document state shared by all phases
//!
//! Everything that used to be global in a converter of this kind (labels, pending
//! references, counters, the bibliography) lives in one [`DocumentContext`] owned by
//! the conversion, so two documents never see each other's state.

pub mod bibliography;
pub mod index;
pub mod numbering;
pub mod xref;

use crate::lyx::ast::escape::escape_text;
use crate::lyx::config::ConversionOptions;
use crate::lyx::diagnostics::Diagnostics;
use crate::lyx::images::{ImageMetadata, NoImageMetadata};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use bibliography::Bibliography;
pub use index::IndexEntries;
pub use numbering::NumberGenerator;
pub use xref::CrossReferences;

/// Settings read from the document header
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentHeader {
    pub textclass: Option<String>,
    pub language: Option<String>,
    pub secnumdepth: Option<i32>,
    pub tocdepth: Option<i32>,
    /// Text of the first Title layout
    pub title: Option<String>,
    /// Every `\key value` line of the header
    pub parameters: BTreeMap<String, String>,
}

impl DocumentHeader {
    pub fn set(&mut self, key: &str, value: &str) {
        match key {
            "textclass" => self.textclass = Some(value.to_string()),
            "language" => self.language = Some(value.to_string()),
            "secnumdepth" => self.secnumdepth = value.parse().ok(),
            "tocdepth" => self.tocdepth = value.parse().ok(),
            _ => {}
        }
        self.parameters.insert(key.to_string(), value.to_string());
    }
}

/// A heading listed in the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// 0 for parts, 1 for chapters, and so on
    pub depth: usize,
    pub style: String,
    pub number: Option<String>,
    /// Escaped heading text
    pub title: String,
    pub anchor: String,
}

pub struct DocumentContext {
    pub options: ConversionOptions,
    pub header: DocumentHeader,
    pub xrefs: CrossReferences,
    pub bibliography: Bibliography,
    pub index: IndexEntries,
    pub numbering: NumberGenerator,
    pub toc: Vec<TocEntry>,
    pub diagnostics: Diagnostics,
    /// Number of the most recent numbered heading
    pub last_number: Option<String>,
    images: Arc<dyn ImageMetadata>,
}

impl DocumentContext {
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            header: DocumentHeader::default(),
            xrefs: CrossReferences::new(),
            bibliography: Bibliography::new(),
            index: IndexEntries::new(),
            numbering: NumberGenerator::new(),
            toc: Vec::new(),
            diagnostics: Diagnostics::new(),
            last_number: None,
            images: Arc::new(NoImageMetadata),
        }
    }

    pub fn with_images(mut self, images: Arc<dyn ImageMetadata>) -> Self {
        self.images = images;
        self
    }

    pub fn images(&self) -> &dyn ImageMetadata {
        self.images.as_ref()
    }

    /// Forget everything learned from a document, keeping options and image source
    pub fn reset(&mut self) {
        let options = self.options.clone();
        let images = Arc::clone(&self.images);
        *self = Self::new(options).with_images(images);
    }

    pub fn translate(&self, key: &str) -> String {
        self.options.translate(key)
    }

    /// Deepest heading level that gets a number
    pub fn secnumdepth(&self) -> i32 {
        self.options
            .secnumdepth
            .or(self.header.secnumdepth)
            .unwrap_or(numbering::DEFAULT_SECNUMDEPTH)
    }

    /// The escaped page title: configured, else the document title
    pub fn title(&self) -> String {
        self.options
            .title
            .as_deref()
            .map(escape_text)
            .or_else(|| self.header.title.clone())
            .unwrap_or_else(|| "Converted document".to_string())
    }

    /// Report references and citations whose targets never appeared
    pub fn check_integrity(&mut self) {
        let missing_labels: Vec<String> = self
            .xrefs
            .unresolved()
            .into_iter()
            .map(str::to_string)
            .collect();
        for key in missing_labels {
            self.diagnostics.error(
                0,
                "undefined-reference",
                format!("Missing label for reference {}", key),
            );
        }
        let missing_entries: Vec<String> = self
            .bibliography
            .unresolved()
            .into_iter()
            .map(str::to_string)
            .collect();
        for key in missing_entries {
            self.diagnostics.error(
                0,
                "undefined-citation",
                format!("Missing bibliography entry for citation {}", key),
            );
        }
    }
}

impl Default for DocumentContext {
    fn default() -> Self {
        Self::new(ConversionOptions::default())
    }
}

impl fmt::Debug for DocumentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentContext")
            .field("options", &self.options)
            .field("header", &self.header)
            .field("toc", &self.toc)
            .field("diagnostics", &self.diagnostics)
            .field("last_number", &self.last_number)
            .finish_non_exhaustive()
    }
}
