//! Testing utilities
//!
//!     LyX sources are verbose: a single paragraph needs a document frame, a header and
//!     a body around it before the parser accepts it. Writing that frame by hand in
//!     every test invites small mistakes (a missing `\end_layout`, an inset without its
//!     blank separator line) that end up testing recovery paths instead of the feature.
//!
//!     The builders here produce well-formed fragments the way LyX writes them:
//!
//!     ```rust,ignore
//!     let source = wrap_body(&layout("Section", &["Intro"]));
//!     let source = wrap_body(&layout("Standard", &[&inset(
//!         "CommandInset label",
//!         &["LatexCommand label", "name \"sec:intro\""],
//!         "",
//!     )]));
//!     ```
//!
//!     The query helpers walk a converted tree, so assertions can name what they look
//!     for instead of indexing through wrapper containers.

use crate::lyx::ast::{Container, Kind, LayoutRole};

/// Header used by [`wrap_body`]
pub const DEFAULT_HEADER: &str = "\\begin_header\n\\textclass article\n\\language english\n\\secnumdepth 3\n\\tocdepth 3\n\\end_header\n";

/// A complete document around a body fragment
pub fn wrap_body(body: &str) -> String {
    wrap_body_with_header(DEFAULT_HEADER, body)
}

/// A complete document with the given header block
pub fn wrap_body_with_header(header: &str, body: &str) -> String {
    format!(
        "#LyX 2.3 created this file. For more info see http://www.lyx.org/\n\\lyxformat 544\n\\begin_document\n{}\n\\begin_body\n\n{}\n\\end_body\n\\end_document\n",
        header.trim_end(),
        body
    )
}

/// A layout with the given lines as content
pub fn layout(style: &str, lines: &[&str]) -> String {
    let mut out = format!("\\begin_layout {}\n", style);
    for line in lines {
        out.push_str(line.trim_end_matches('\n'));
        out.push('\n');
    }
    out.push_str("\\end_layout\n\n");
    out
}

/// An inset with parameter lines and an optional body
pub fn inset(kind: &str, parameters: &[&str], body: &str) -> String {
    let mut out = format!("\\begin_inset {}\n", kind);
    for parameter in parameters {
        out.push_str(parameter);
        out.push('\n');
    }
    out.push('\n');
    if !body.is_empty() {
        out.push_str(body.trim_end_matches('\n'));
        out.push('\n');
    }
    out.push_str("\\end_inset\n");
    out
}

/// A plain layout wrapped in an inset, as captions and footnotes hold text
pub fn text_inset(kind: &str, parameters: &[&str], text: &str) -> String {
    inset(kind, parameters, &layout("Plain Layout", &[text]))
}

/// A `label` command inset
pub fn label(key: &str) -> String {
    inset(
        "CommandInset label",
        &["LatexCommand label", &format!("name \"{}\"", key)],
        "",
    )
}

/// A `ref` command inset
pub fn reference(key: &str) -> String {
    inset(
        "CommandInset ref",
        &["LatexCommand ref", &format!("reference \"{}\"", key)],
        "",
    )
}

/// Every descendant accepted by `pred`
pub fn find_all<'a>(root: &'a Container, pred: &dyn Fn(&Container) -> bool) -> Vec<&'a Container> {
    root.find_all(pred)
}

/// Every layout with the given style, in document order
pub fn layouts<'a>(root: &'a Container, style: &str) -> Vec<&'a Container> {
    root.find_all(&|c| c.layout().is_some_and(|l| l.style == style))
}

/// Every standard paragraph, in document order
pub fn paragraphs(root: &Container) -> Vec<&Container> {
    root.find_all(&|c| {
        c.layout()
            .is_some_and(|l| matches!(l.role, LayoutRole::Standard { .. }))
    })
}

/// The numbers given to headings of one style
pub fn heading_numbers(root: &Container, style: &str) -> Vec<Option<String>> {
    layouts(root, style)
        .into_iter()
        .filter_map(|c| c.layout().map(|l| l.number.clone()))
        .collect()
}

/// The rendered arrows of all references, in document order
pub fn reference_arrows(root: &Container) -> Vec<&'static str> {
    root.find_all(&|c| matches!(c.kind, Kind::Reference(_)))
        .into_iter()
        .filter_map(|c| match &c.kind {
            Kind::Reference(reference) => Some(reference.direction.arrow()),
            _ => None,
        })
        .collect()
}
