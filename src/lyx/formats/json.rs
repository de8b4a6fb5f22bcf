//! JSON dump of the postprocessed tree

use super::{Format, FormatError};
use crate::lyx::transforms::Document;
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormat;

#[derive(Serialize)]
struct Dump<'a> {
    title: String,
    root: &'a crate::lyx::ast::Container,
    diagnostics: &'a crate::lyx::diagnostics::Diagnostics,
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "The container tree as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let dump = Dump {
            title: doc.context.title(),
            root: &doc.root,
            diagnostics: &doc.context.diagnostics,
        };
        serde_json::to_string_pretty(&dump)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyx::ast::{Container, Kind};
    use crate::lyx::context::DocumentContext;

    #[test]
    fn test_tree_is_dumped() {
        let doc = Document {
            root: Container::new(Kind::Group).with_children(vec![Container::text("hello")]),
            context: DocumentContext::default(),
        };
        let json = JsonFormat.serialize(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Converted document");
        assert_eq!(value["root"]["children"][0]["kind"]["Text"], "hello");
    }
}
