//! Main module for the LyX to HTML conversion

pub mod assembling;
pub mod ast;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod endings;
pub mod error;
pub mod formats;
pub mod formula;
pub mod images;
pub mod loader;
pub mod parsing;
pub mod reading;
pub mod testing;
pub mod transforms;

pub use ast::{Container, Kind};
pub use config::ConversionOptions;
pub use context::DocumentContext;
pub use diagnostics::{Diagnostic, DiagnosticSeverity};
pub use loader::{DocumentLoader, LoaderError};
pub use transforms::{Document, TransformError};

/// Converts a LyX source into a complete HTML page using default options.
pub fn convert(source: &str) -> Result<String, LoaderError> {
    DocumentLoader::from_string(source).to_html()
}
