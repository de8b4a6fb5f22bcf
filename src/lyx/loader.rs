//! Document loading utilities
//!
//! [`DocumentLoader`] holds a LyX source with the options and image metadata to
//! convert it with, and runs transforms on it. The command line tool and the
//! integration tests both go through it.
//!
//! ```rust,ignore
//! use lyx_html::lyx::loader::DocumentLoader;
//!
//! let html = DocumentLoader::from_path("paper.lyx")?.to_html()?;
//!
//! let doc = DocumentLoader::from_string(source)
//!     .with_options(ConversionOptions::from_path("site.yaml")?)
//!     .parse()?;
//! ```

use crate::lyx::config::{ConfigError, ConversionOptions};
use crate::lyx::context::DocumentContext;
use crate::lyx::formats::{FormatError, FormatRegistry};
use crate::lyx::images::{ImageMetadata, NoImageMetadata};
use crate::lyx::transforms::standard::{ASSEMBLED, PARSED, TO_HTML};
use crate::lyx::transforms::{Conversion, Document, Transform, TransformError};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Error that can occur when loading documents
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

/// A source with everything needed to convert it
pub struct DocumentLoader {
    source: String,
    options: ConversionOptions,
    images: Arc<dyn ImageMetadata>,
}

impl DocumentLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        log::info!("loaded {} ({} bytes)", path.display(), source.len());
        Ok(Self::from_string(source))
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
            options: ConversionOptions::default(),
            images: Arc::new(NoImageMetadata),
        }
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    /// Layer a YAML options file over the defaults
    pub fn with_config_file<P: AsRef<Path>>(self, path: P) -> Result<Self, LoaderError> {
        let options = ConversionOptions::from_path(path)?;
        Ok(self.with_options(options))
    }

    pub fn with_images(mut self, images: Arc<dyn ImageMetadata>) -> Self {
        self.images = images;
        self
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ConversionOptions {
        &mut self.options
    }

    /// A fresh conversion of the source; every call starts from an empty context
    pub fn conversion(&self) -> Conversion {
        let context =
            DocumentContext::new(self.options.clone()).with_images(Arc::clone(&self.images));
        Conversion::new(self.source.clone(), context)
    }

    /// Run a custom transform on the source
    pub fn with<O: 'static>(&self, transform: &Transform<Conversion, O>) -> Result<O, LoaderError> {
        Ok(transform.run(self.conversion())?)
    }

    /// The postprocessed document
    pub fn parse(&self) -> Result<Document, LoaderError> {
        self.with(&ASSEMBLED)
    }

    /// The document as the grammar built it, before postprocessing
    pub fn parse_only(&self) -> Result<Document, LoaderError> {
        self.with(&PARSED)
    }

    /// The HTML page, or the bare body when the options say `raw`
    pub fn to_html(&self) -> Result<String, LoaderError> {
        self.with(&TO_HTML)
    }

    /// The postprocessed tree as JSON
    pub fn json(&self) -> Result<String, LoaderError> {
        self.serialize("json")
    }

    /// The postprocessed document in a registered format
    pub fn serialize(&self, format: &str) -> Result<String, LoaderError> {
        let doc = self.parse()?;
        Ok(FormatRegistry::with_defaults().serialize(&doc, format)?)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
