//! Standard transform definitions
//!
//! Pre-built pipelines, shared as `once_cell::sync::Lazy` statics.

use crate::lyx::transforms::stages::{HtmlRendering, Parsing, Postprocessing};
use crate::lyx::transforms::{Conversion, Document, Transform};
use once_cell::sync::Lazy;

/// Type alias for transforms ending in a document tree
pub type DocumentTransform = Transform<Conversion, Document>;

/// Type alias for the complete conversion
pub type HtmlTransform = Transform<Conversion, String>;

/// Parsing only: Conversion → Document, as the grammar built it
pub static PARSED: Lazy<DocumentTransform> =
    Lazy::new(|| Transform::start().then(Parsing::new()));

/// Conversion → Document, numbered, grouped and checked
pub static ASSEMBLED: Lazy<DocumentTransform> = Lazy::new(|| {
    Transform::start()
        .then(Parsing::new())
        .then(Postprocessing::new())
});

/// Conversion → String, the full conversion
pub static TO_HTML: Lazy<HtmlTransform> = Lazy::new(|| {
    Transform::start()
        .then(Parsing::new())
        .then(Postprocessing::new())
        .then(HtmlRendering)
});
