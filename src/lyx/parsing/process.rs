//! Finalization of parsed nodes
//!
//! [`process_node`] is the one-shot hook run on every node once its children are
//! complete. It decides the node's [`Kind`] from its header tokens and parameters and
//! registers labels, references, citations and index entries with the document
//! context, in document order. It never reads source lines.

use super::node_type::NodeType;
use super::parser::ParsedNode;
use crate::lyx::ast::escape::{escape_text, substitute_line, unescape_text};
use crate::lyx::ast::tables::{layout_tag, FAMILIES, LAYOUT_TAGS, QUOTES, SHAPES, SPACES};
use crate::lyx::ast::{
    BibEntry, Cell, Citation, Container, Float, Footnote, Formula, Image, Kind, Layout,
    LayoutRole, ParameterValue, Reference, TagSpec,
};
use crate::lyx::context::DocumentContext;
use crate::lyx::formula::FormulaFactory;
use crate::lyx::images::{destination_for, scale_dimensions};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Display environments that get an equation number unless starred
const NUMBERED_ENVIRONMENTS: &[&str] = &[
    "equation", "align", "eqnarray", "gather", "multline", "alignat", "flalign",
];

static EQUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\\begin\{equation(\*?)\}(.*)\\end\{equation\*?\}$")
        .expect("valid equation regex")
});

static ENVIRONMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\\begin\{([A-Za-z]+)(\*?)\}").expect("valid environment regex")
});

/// Turn a parsed node into its finalized container
pub fn process_node(node: ParsedNode, ctx: &mut DocumentContext) -> Container {
    let line = node.begin_line;
    let kind = match node.node_type {
        NodeType::Text => return process_text(node, ctx),
        NodeType::Hidden
        | NodeType::Footer
        | NodeType::Align
        | NodeType::Ert
        | NodeType::ShortTitle => Kind::Hidden,
        NodeType::Header => {
            for (key, value) in &node.parameters {
                if let Some(value) = value.as_text() {
                    ctx.header.set(key, value);
                }
            }
            Kind::Hidden
        }
        NodeType::Body | NodeType::InsetText => Kind::Group,
        NodeType::Layout
        | NodeType::StandardLayout
        | NodeType::PlainLayout
        | NodeType::ListItem
        | NodeType::Description
        | NodeType::CodeLayout
        | NodeType::BibliographyLayout => return process_layout(node, ctx),
        NodeType::Deeper => Kind::Deeper,
        NodeType::Emphasis
        | NodeType::Bold
        | NodeType::Shape
        | NodeType::Family
        | NodeType::Versalitas
        | NodeType::Size
        | NodeType::Color
        | NodeType::Strikeout
        | NodeType::Underline
        | NodeType::DoubleUnderline
        | NodeType::Wave
        | NodeType::ChangeInserted
        | NodeType::ChangeDeleted => Kind::Styled(text_style(&node)),
        NodeType::Newline => Kind::LineBreak,
        NodeType::Newpage => Kind::PageBreak,
        NodeType::Rule | NodeType::RuleInset => Kind::HorizontalRule,
        NodeType::Hfill => Kind::HorizontalFill,
        NodeType::Appendix => Kind::AppendixMarker,
        NodeType::Formula => process_formula(&node, ctx),
        NodeType::Image => process_image(&node, ctx),
        NodeType::Float | NodeType::Wrap => Kind::Float(Float {
            float_type: node.header.get(2).cloned().unwrap_or_default(),
            number: None,
            wrap: node.node_type == NodeType::Wrap,
        }),
        NodeType::Caption => Kind::Caption,
        NodeType::Footnote | NodeType::MarginNote => Kind::Footnote(Footnote {
            number: None,
            margin: node.node_type == NodeType::MarginNote,
        }),
        NodeType::Note => match node.header.get(2).map(String::as_str) {
            Some("Greyedout") => Kind::Tagged(TagSpec::new("span").with_class("greyedout")),
            _ => Kind::Hidden,
        },
        NodeType::Table => {
            let long = node
                .parameters
                .get("features")
                .and_then(ParameterValue::as_attributes)
                .and_then(|features| features.get("islongtable"))
                .is_some_and(|value| value == "true");
            Kind::Table { long }
        }
        NodeType::Column => Kind::Column {
            alignment: node.parameter_text("alignment").map(str::to_string),
        },
        NodeType::Row => Kind::Row,
        NodeType::Cell => Kind::Cell(Cell {
            colspan: 1,
            alignment: node.parameter_text("alignment").map(str::to_string),
        }),
        NodeType::Quotes => {
            let code = node.header.get(2).map(String::as_str).unwrap_or("eld");
            Kind::Constant(QUOTES.get(code).copied().unwrap_or("\"").to_string())
        }
        NodeType::Space => {
            let space = node.header_rest(2);
            if space == "\\hfill{}" {
                Kind::HorizontalFill
            } else {
                Kind::Constant(SPACES.get(space.as_str()).copied().unwrap_or(" ").to_string())
            }
        }
        NodeType::NewlineInset => Kind::LineBreak,
        NodeType::NewpageInset => Kind::PageBreak,
        NodeType::VSpace => Kind::Tagged(
            TagSpec::new("div")
                .with_class(format!("vspace {}", node.header_rest(2)))
                .block(),
        ),
        NodeType::Listing => Kind::Listing {
            inline: node
                .parameters
                .get("inline")
                .is_some_and(ParameterValue::is_true),
        },
        NodeType::BoxInset => Kind::Tagged(
            TagSpec::new("div")
                .with_class(node.header.get(2).cloned().unwrap_or_default())
                .block(),
        ),
        NodeType::Branch => {
            let key = format!("branch:{}", node.header_rest(2));
            if ctx.header.parameters.get(&key).map(String::as_str) == Some("1") {
                Kind::Group
            } else {
                Kind::Hidden
            }
        }
        NodeType::Flex => Kind::Styled(
            TagSpec::new("span").with_class(format!("flex_{}", flex_class(&node.header_rest(2)))),
        ),
        NodeType::FlexUrl => {
            let target = children_text(&node);
            return Container::new(Kind::Url {
                target: unescape_text(target.trim()),
                name: None,
            })
            .at_line(line);
        }
        NodeType::IndexEntry => {
            let term = children_text(&node).trim().to_string();
            let anchor = ctx.index.register(&term);
            return Container::new(Kind::IndexEntry { term, anchor }).at_line(line);
        }
        NodeType::Info => {
            let arg = node.parameter_text("arg").unwrap_or_default();
            Kind::Constant(escape_text(arg))
        }
        NodeType::Phantom => Kind::Tagged(
            TagSpec::new("span").with_style("visibility: hidden;"),
        ),
        NodeType::Label => {
            let key = node.parameter_text("name").unwrap_or_default().to_string();
            register_label(&key, line, ctx);
            Kind::Label { key }
        }
        NodeType::Reference => {
            let key = node
                .parameter_text("reference")
                .unwrap_or_default()
                .to_string();
            let format = reference_format(node.parameter_text("LatexCommand").unwrap_or("ref"));
            let (_, direction) = ctx.xrefs.add_reference(&key);
            Kind::Reference(Reference {
                key,
                format: format.to_string(),
                direction,
            })
        }
        NodeType::Citation => {
            let keys: Vec<String> = node
                .parameter_text("key")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect();
            let id = ctx.bibliography.cite(&keys);
            Kind::Citation(Citation { keys, id })
        }
        NodeType::BibItem => {
            let key = node.parameter_text("key").unwrap_or_default().to_string();
            let label = node
                .parameter_text("label")
                .filter(|label| !label.is_empty());
            let label = ctx.bibliography.add_entry(&key, label);
            Kind::BibEntry(BibEntry { key, label })
        }
        NodeType::BibTeX => {
            ctx.diagnostics.info(
                line,
                "unknown-inset",
                format!(
                    "BibTeX database {} is not read",
                    node.parameter_text("bibfiles").unwrap_or_default()
                ),
            );
            Kind::Hidden
        }
        NodeType::Url => Kind::Url {
            target: node.parameter_text("target").unwrap_or_default().to_string(),
            name: node
                .parameter_text("name")
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        },
        NodeType::TableOfContents => Kind::TableOfContents,
        NodeType::PrintIndex => Kind::PrintIndex,
        NodeType::Include => Kind::Include {
            filename: node.parameter_text("filename").unwrap_or_default().to_string(),
        },
        NodeType::UnknownInset => {
            let name = node.header_rest(1);
            ctx.diagnostics
                .warning(line, "unknown-inset", format!("Unknown inset {}", name));
            Kind::Tagged(TagSpec::new("span").with_class("unknown"))
        }
    };
    finish(node, kind)
}

fn finish(node: ParsedNode, kind: Kind) -> Container {
    Container {
        kind,
        header: node.header,
        parameters: node.parameters,
        children: node.children,
        begin_line: node.begin_line,
    }
}

fn register_label(key: &str, line: usize, ctx: &mut DocumentContext) {
    if !ctx.xrefs.add_label(key) {
        ctx.diagnostics
            .warning(line, "duplicate-label", format!("Duplicate label {}", key));
    }
}

fn children_text(node: &ParsedNode) -> String {
    node.children.iter().map(Container::plain_text).collect()
}

fn process_text(node: ParsedNode, ctx: &mut DocumentContext) -> Container {
    let line = node.lines.first().map(String::as_str).unwrap_or_default();
    let substituted = substitute_line(line);
    if substituted.unknown_command {
        ctx.diagnostics.warning(
            node.begin_line,
            "unknown-command",
            format!("Unknown command in {}", line.trim()),
        );
    }
    Container::text(substituted.html).at_line(node.begin_line)
}

fn process_layout(mut node: ParsedNode, ctx: &mut DocumentContext) -> Container {
    let style = node.header_rest(1);
    let role = match node.node_type {
        NodeType::StandardLayout => LayoutRole::Standard { indented: false },
        NodeType::PlainLayout => LayoutRole::Plain,
        NodeType::ListItem => LayoutRole::ListItem {
            ordered: style == "Enumerate",
        },
        NodeType::Description => LayoutRole::Description,
        NodeType::CodeLayout => LayoutRole::Code,
        NodeType::BibliographyLayout => LayoutRole::Bibliography,
        _ => {
            if !LAYOUT_TAGS.contains_key(style.trim_end_matches('*')) {
                ctx.diagnostics.info(
                    node.begin_line,
                    "unknown-layout",
                    format!("Unknown layout {}, rendered as div", style),
                );
            }
            LayoutRole::Named
        }
    };
    let align = node
        .children
        .iter()
        .find(|child| child.header.first().map(String::as_str) == Some("\\align"))
        .and_then(|child| child.header.get(1).cloned());

    if role == LayoutRole::Description {
        split_description_label(&mut node.children);
    }
    if style == "Title" && ctx.header.title.is_none() {
        let title = children_text(&node);
        ctx.header.title = Some(title.trim().to_string());
    }

    let tag = match role {
        LayoutRole::Plain => String::new(),
        LayoutRole::ListItem { .. } => "li".to_string(),
        LayoutRole::Description => "div".to_string(),
        LayoutRole::Code => "pre".to_string(),
        LayoutRole::Bibliography => "p".to_string(),
        _ => layout_tag(&style).to_string(),
    };
    let kind = Kind::Layout(Layout {
        style,
        role,
        tag,
        align,
        number: None,
        anchor: None,
    });
    finish(node, kind)
}

/// The first word of a description item is its label
fn split_description_label(children: &mut Vec<Container>) {
    let Some(position) = children
        .iter()
        .position(|child| !matches!(child.kind, Kind::Hidden))
    else {
        return;
    };
    let Kind::Text(text) = &children[position].kind else {
        return;
    };
    let (label, rest) = match text.split_once(' ') {
        Some((label, rest)) => (label.to_string(), rest.to_string()),
        None => (text.clone(), String::new()),
    };
    let line = children[position].begin_line;
    children[position] = Container::text(rest).at_line(line);
    let label = Container::new(Kind::Tagged(
        TagSpec::new("span").with_class("Description-entry"),
    ))
    .with_children(vec![Container::text(label)])
    .at_line(line);
    children.insert(position, Container::constant(" "));
    children.insert(position, label);
}

fn text_style(node: &ParsedNode) -> TagSpec {
    let value = node.header.get(1).map(String::as_str).unwrap_or_default();
    match node.node_type {
        NodeType::Emphasis => TagSpec::new("i"),
        NodeType::Bold => TagSpec::new("b"),
        NodeType::Shape => styled_lookup(SHAPES.get(value), value),
        NodeType::Family => styled_lookup(FAMILIES.get(value), value),
        NodeType::Versalitas => TagSpec::new("span").with_class("versalitas"),
        NodeType::Size => TagSpec::new("span").with_class(value),
        NodeType::Color => TagSpec::new("span").with_style(format!("color: {};", value)),
        NodeType::Strikeout => TagSpec::new("span").with_class("strikeout"),
        NodeType::Underline => TagSpec::new("u"),
        NodeType::DoubleUnderline => TagSpec::new("span").with_class("uuline"),
        NodeType::Wave => TagSpec::new("span").with_class("uwave"),
        NodeType::ChangeInserted => TagSpec::new("span").with_class("inserted"),
        NodeType::ChangeDeleted => TagSpec::new("span").with_class("deleted"),
        _ => TagSpec::new("span"),
    }
}

fn styled_lookup(entry: Option<&(&'static str, Option<&'static str>)>, value: &str) -> TagSpec {
    match entry {
        Some((tag, Some(class))) => TagSpec::new(*tag).with_class(*class),
        Some((tag, None)) => TagSpec::new(*tag),
        None => TagSpec::new("span").with_class(value),
    }
}

fn flex_class(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
        .collect()
}

fn reference_format(command: &str) -> &'static str {
    match command {
        "eqref" => "(@↕)",
        "pageref" | "vpageref" => "↕",
        _ => "@↕",
    }
}

/// Whether a formula is displayed or inline, numbered, and its inner source
#[derive(Debug, PartialEq, Eq)]
struct FormulaShape<'t> {
    display: bool,
    numbered: bool,
    source: &'t str,
}

fn classify_formula(text: &str) -> FormulaShape<'_> {
    let delimited = |start: &str, end: &str| {
        text.strip_prefix(start)
            .and_then(|inner| inner.strip_suffix(end))
    };
    if let Some(inner) = delimited("$$", "$$").or_else(|| delimited("\\[", "\\]")) {
        return FormulaShape {
            display: true,
            numbered: false,
            source: inner,
        };
    }
    if let Some(inner) = delimited("$", "$").or_else(|| delimited("\\(", "\\)")) {
        return FormulaShape {
            display: false,
            numbered: false,
            source: inner,
        };
    }
    if let Some(captures) = EQUATION.captures(text) {
        let starred = captures.get(1).is_some_and(|star| !star.as_str().is_empty());
        let inner = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        return FormulaShape {
            display: true,
            numbered: !starred,
            source: inner,
        };
    }
    if let Some(captures) = ENVIRONMENT.captures(text) {
        let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let starred = captures.get(2).is_some_and(|star| !star.as_str().is_empty());
        return FormulaShape {
            display: true,
            numbered: !starred && NUMBERED_ENVIRONMENTS.contains(&name),
            source: text,
        };
    }
    FormulaShape {
        display: false,
        numbered: false,
        source: text,
    }
}

fn process_formula(node: &ParsedNode, ctx: &mut DocumentContext) -> Kind {
    let text = node.lines.join("\n");
    let shape = classify_formula(text.trim());
    let parsed =
        FormulaFactory::standard().parse_formula_limited(shape.source, ctx.options.max_nesting);
    for error in parsed.errors {
        ctx.diagnostics.warning(node.begin_line, "formula", error);
    }
    for key in parsed.root.labels() {
        register_label(&key, node.begin_line, ctx);
    }
    Kind::Formula(Formula {
        display: shape.display,
        numbered: shape.numbered,
        number: None,
        root: parsed.root,
    })
}

fn process_image(node: &ParsedNode, ctx: &mut DocumentContext) -> Kind {
    let source = node.parameter_text("filename").unwrap_or_default().to_string();
    let destination = destination_for(&source);
    let explicit = |key: &str| {
        node.parameter_text(key)
            .map(|value| value.trim_end_matches("px"))
            .and_then(|value| value.parse::<u32>().ok())
    };
    let (mut width, mut height) = (explicit("width"), explicit("height"));
    if width.is_none() && height.is_none() {
        match ctx.images().dimensions(Path::new(&destination)) {
            Some(dimensions) => {
                let scale = node
                    .parameter_text("scale")
                    .and_then(|scale| scale.parse::<f64>().ok())
                    .unwrap_or(100.0);
                let (w, h) = scale_dimensions(dimensions, scale);
                width = Some(w);
                height = Some(h);
            }
            None => ctx.diagnostics.warning(
                node.begin_line,
                "image-not-found",
                format!("No dimensions for image {}", destination),
            ),
        }
    }
    Kind::Image(Image {
        source,
        destination,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyx::ast::Direction;
    use crate::lyx::images::StaticImageMetadata;
    use rstest::rstest;
    use std::sync::Arc;

    fn node(node_type: NodeType, header: &str) -> ParsedNode {
        let mut node = ParsedNode::new(node_type, 3);
        node.header = header.split_whitespace().map(str::to_string).collect();
        node
    }

    fn with_parameter(mut node: ParsedNode, key: &str, value: &str) -> ParsedNode {
        node.parameters
            .insert(key.to_string(), ParameterValue::Text(value.to_string()));
        node
    }

    #[rstest]
    #[case("$x$", false, false, "x")]
    #[case("$$x$$", true, false, "x")]
    #[case("\\[x\\]", true, false, "x")]
    #[case("\\(x\\)", false, false, "x")]
    #[case("\\begin{equation}x\\end{equation}", true, true, "x")]
    #[case("\\begin{equation*}x\\end{equation*}", true, false, "x")]
    #[case("\\begin{align}x\\end{align}", true, true, "\\begin{align}x\\end{align}")]
    #[case("\\begin{align*}x\\end{align*}", true, false, "\\begin{align*}x\\end{align*}")]
    fn test_formula_shapes(
        #[case] text: &str,
        #[case] display: bool,
        #[case] numbered: bool,
        #[case] source: &str,
    ) {
        assert_eq!(
            classify_formula(text),
            FormulaShape {
                display,
                numbered,
                source,
            }
        );
    }

    #[test]
    fn test_text_with_unknown_command_is_reported() {
        let mut ctx = DocumentContext::default();
        let mut text = ParsedNode::new(NodeType::Text, 7);
        text.lines.push("\\mystery arg".to_string());
        let container = process_node(text, &mut ctx);
        assert_eq!(container.kind, Kind::Text("\\mystery arg".to_string()));
        assert!(ctx.diagnostics.has_code("unknown-command"));
    }

    #[test]
    fn test_reference_before_label_points_down() {
        let mut ctx = DocumentContext::default();
        let reference = with_parameter(
            node(NodeType::Reference, "\\begin_inset CommandInset ref"),
            "reference",
            "a",
        );
        let reference = process_node(reference, &mut ctx);
        let label = with_parameter(
            node(NodeType::Label, "\\begin_inset CommandInset label"),
            "name",
            "a",
        );
        process_node(label, &mut ctx);

        match reference.kind {
            Kind::Reference(reference) => assert_eq!(reference.direction, Direction::Down),
            other => panic!("expected a reference, got {:?}", other),
        }
        assert!(ctx.xrefs.unresolved().is_empty());
    }

    #[test]
    fn test_duplicate_label_is_reported() {
        let mut ctx = DocumentContext::default();
        for _ in 0..2 {
            let label = with_parameter(
                node(NodeType::Label, "\\begin_inset CommandInset label"),
                "name",
                "dup",
            );
            process_node(label, &mut ctx);
        }
        assert!(ctx.diagnostics.has_code("duplicate-label"));
    }

    #[test]
    fn test_eqref_format() {
        let mut ctx = DocumentContext::default();
        let reference = with_parameter(
            with_parameter(
                node(NodeType::Reference, "\\begin_inset CommandInset ref"),
                "reference",
                "eq:1",
            ),
            "LatexCommand",
            "eqref",
        );
        match process_node(reference, &mut ctx).kind {
            Kind::Reference(reference) => assert_eq!(reference.format, "(@↕)"),
            other => panic!("expected a reference, got {:?}", other),
        }
    }

    #[test]
    fn test_image_dimensions_are_scaled() {
        let images = StaticImageMetadata::new().with("plot.png", 200, 100);
        let mut ctx = DocumentContext::default().with_images(Arc::new(images));
        let image = with_parameter(
            with_parameter(node(NodeType::Image, "\\begin_inset Graphics"), "filename", "plot.eps"),
            "scale",
            "50",
        );
        match process_node(image, &mut ctx).kind {
            Kind::Image(image) => {
                assert_eq!(image.destination, "plot.png");
                assert_eq!((image.width, image.height), (Some(100), Some(50)));
            }
            other => panic!("expected an image, got {:?}", other),
        }
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_image_keeps_node() {
        let mut ctx = DocumentContext::default();
        let image = with_parameter(
            node(NodeType::Image, "\\begin_inset Graphics"),
            "filename",
            "gone.png",
        );
        let container = process_node(image, &mut ctx);
        assert!(matches!(container.kind, Kind::Image(Image { width: None, .. })));
        assert!(ctx.diagnostics.has_code("image-not-found"));
    }

    #[test]
    fn test_description_label_is_split() {
        let mut ctx = DocumentContext::default();
        let mut item = node(NodeType::Description, "\\begin_layout Description");
        item.children.push(Container::text("Term explained here"));
        let container = process_node(item, &mut ctx);
        assert!(matches!(container.children[0].kind, Kind::Tagged(_)));
        assert_eq!(container.plain_text(), "Term explained here");
    }

    #[test]
    fn test_title_is_captured() {
        let mut ctx = DocumentContext::default();
        let mut title = node(NodeType::Layout, "\\begin_layout Title");
        title.children.push(Container::text("On Things"));
        process_node(title, &mut ctx);
        assert_eq!(ctx.title(), "On Things");
    }

    #[test]
    fn test_unknown_inset_degrades_to_span() {
        let mut ctx = DocumentContext::default();
        let unknown = node(NodeType::UnknownInset, "\\begin_inset Sparkles");
        let container = process_node(unknown, &mut ctx);
        assert_eq!(
            container.kind,
            Kind::Tagged(TagSpec::new("span").with_class("unknown"))
        );
        assert!(ctx.diagnostics.has_code("unknown-inset"));
    }

    #[test]
    fn test_flex_url_target_is_unescaped() {
        let mut ctx = DocumentContext::default();
        let mut url = node(NodeType::FlexUrl, "\\begin_inset Flex URL");
        url.children.push(
            Container::new(Kind::Layout(Layout {
                style: "Plain Layout".to_string(),
                role: LayoutRole::Plain,
                tag: String::new(),
                align: None,
                number: None,
                anchor: None,
            }))
            .with_children(vec![Container::text("http://a.org/?x=1&amp;y=2")]),
        );
        assert_eq!(
            process_node(url, &mut ctx).kind,
            Kind::Url {
                target: "http://a.org/?x=1&y=2".to_string(),
                name: None,
            }
        );
    }
}
