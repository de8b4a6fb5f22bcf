//! HTML output
//!
//! Strategy: direct traversal of the postprocessed tree, children first.
//!
//! [`render`] renders a node's children and hands the result to [`emit`], which only
//! looks at the node's kind, its parameters and the already rendered children. Kinds
//! that link to other parts of the document (references, citations, the index and the
//! table of contents) read what postprocessing recorded in the [`DocumentContext`].
//!
//! | Kind | HTML |
//! |------|------|
//! | Layout | its table tag (`h1`..`h4`, `div`, `blockquote`, `li`, `pre`), or contents only |
//! | List | `<ul>` / `<ol>` |
//! | Styled, Tagged | the tag of their [`TagSpec`] |
//! | Footnote | `span.FootOuter` with the marker and a hover box |
//! | Float | `div.float` around `div.<type>` |
//! | Formula | `span.formula`, or `div.formula` with its number when displayed |
//! | Table, Row, Cell | `<table>`, `<tr>`, `<td>` |
//! | Reference | `a.Reference` with the label number and an arrow |
//! | Citation | `[n, m]` links to the bibliography entries |
//!
//! [`page`] wraps the rendered body in a complete document unless the options ask for
//! the raw body.

use super::{Format, FormatError};
use crate::lyx::ast::escape::{escape_attribute, escape_text};
use crate::lyx::ast::tables::language_code;
use crate::lyx::ast::{
    Citation, Container, Float, Footnote, Formula, Image, Kind, Layout, LayoutRole, Parameters,
    Reference, TagSpec,
};
use crate::lyx::context::DocumentContext;
use crate::lyx::transforms::Document;

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML page, or the bare body in raw mode"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let body = render(&doc.root, &doc.context);
        if doc.context.options.raw {
            Ok(body)
        } else {
            Ok(page(&body, &doc.context))
        }
    }
}

/// Render a node after rendering its children
pub fn render(node: &Container, ctx: &DocumentContext) -> String {
    let separator = match node.kind {
        Kind::Listing { inline: false } => "\n",
        _ => "",
    };
    let children: Vec<String> = node.children.iter().map(|c| render(c, ctx)).collect();
    emit(&node.kind, &node.parameters, &children.join(separator), ctx)
}

/// The HTML of one node, given its rendered children
pub fn emit(kind: &Kind, parameters: &Parameters, children: &str, ctx: &DocumentContext) -> String {
    match kind {
        Kind::Text(text) | Kind::Constant(text) => text.clone(),
        Kind::Hidden | Kind::AppendixMarker | Kind::Column { .. } => String::new(),
        Kind::Group => children.to_string(),
        Kind::Layout(layout) => emit_layout(layout, children),
        Kind::List { ordered } => block(if *ordered { "ol" } else { "ul" }, &[], children),
        Kind::Deeper => block("div", &[("class", "deeper".to_string())], children),
        Kind::Styled(spec) | Kind::Tagged(spec) => wrap(spec, children),
        Kind::LineBreak => "<br/>\n".to_string(),
        Kind::PageBreak => "<p><br/></p>\n".to_string(),
        Kind::HorizontalRule => "<hr class=\"line\"/>\n".to_string(),
        Kind::HorizontalFill => "<span class=\"hfill\"> </span>".to_string(),
        Kind::Footnote(footnote) => emit_footnote(footnote, children),
        Kind::Float(float) => emit_float(float, children),
        Kind::Caption => block("div", &[("class", "caption".to_string())], children),
        Kind::Label { key } => tag("a", &[("class", "Label".to_string()), ("id", key.clone())], " "),
        Kind::Reference(reference) => emit_reference(reference, ctx),
        Kind::Citation(citation) => emit_citation(citation, ctx),
        Kind::BibEntry(entry) => emit_bib_entry(&entry.key, &entry.label, ctx),
        Kind::IndexEntry { term, anchor } => tag(
            "a",
            &[
                ("class", "IndexReference".to_string()),
                ("id", anchor.clone()),
                ("href", format!("#{}", index_slug(term))),
            ],
            "↓",
        ),
        Kind::PrintIndex => emit_index(ctx),
        Kind::TableOfContents => emit_toc(ctx),
        Kind::Include { filename } => tag(
            "a",
            &[("class", "include".to_string()), ("href", filename.clone())],
            &escape_text(filename),
        ),
        Kind::Url { target, name } => tag(
            "a",
            &[("class", "url".to_string()), ("href", target.clone())],
            &escape_text(name.as_deref().unwrap_or(target)),
        ),
        Kind::Listing { inline } => emit_listing(*inline, parameters, children),
        Kind::Formula(formula) => emit_formula(formula),
        Kind::Image(image) => emit_image(image),
        Kind::Table { .. } => block("table", &[], &format!("\n{}", children)),
        Kind::Row => block("tr", &[], &format!("\n{}", children)),
        Kind::Cell(cell) => {
            let mut attributes = vec![("class", "cell".to_string())];
            if cell.colspan > 1 {
                attributes.push(("colspan", cell.colspan.to_string()));
            }
            if let Some(alignment) = &cell.alignment {
                attributes.push(("style", format!("text-align: {};", alignment)));
            }
            block("td", &attributes, children)
        }
    }
}

fn attribute_list(attributes: &[(&str, String)]) -> String {
    attributes
        .iter()
        .map(|(name, value)| format!(" {}=\"{}\"", name, escape_attribute(value)))
        .collect()
}

/// `<name attributes>contents</name>`
pub fn tag(name: &str, attributes: &[(&str, String)], contents: &str) -> String {
    format!("<{}{}>{}</{}>", name, attribute_list(attributes), contents, name)
}

/// A tag on its own line
pub fn block(name: &str, attributes: &[(&str, String)], contents: &str) -> String {
    format!("{}\n", tag(name, attributes, contents))
}

fn empty(name: &str, attributes: &[(&str, String)]) -> String {
    format!("<{}{}/>", name, attribute_list(attributes))
}

/// Wrap contents in the element a [`TagSpec`] describes
pub fn wrap(spec: &TagSpec, contents: &str) -> String {
    let mut attributes = Vec::new();
    if let Some(class) = &spec.class {
        attributes.push(("class", class.clone()));
    }
    if let Some(style) = &spec.style {
        attributes.push(("style", style.clone()));
    }
    if spec.block {
        block(&spec.tag, &attributes, contents)
    } else {
        tag(&spec.tag, &attributes, contents)
    }
}

/// Class name for a layout style: `Section*` becomes `Section-`
fn style_class(style: &str) -> String {
    style
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn emit_layout(layout: &Layout, children: &str) -> String {
    if layout.tag.is_empty() {
        return children.to_string();
    }
    let class = match layout.role {
        LayoutRole::Standard { indented: true } => "Indented".to_string(),
        _ => style_class(&layout.style),
    };
    let mut attributes = vec![("class", class)];
    if let Some(align) = &layout.align {
        let align = if align == "block" { "justify" } else { align.as_str() };
        attributes.push(("style", format!("text-align: {};", align)));
    }
    let mut contents = String::new();
    if let Some(anchor) = &layout.anchor {
        contents.push_str(&tag(
            "a",
            &[("class", "toc".to_string()), ("id", anchor.clone())],
            "",
        ));
    }
    contents.push_str(children);
    block(&layout.tag, &attributes, &contents)
}

fn emit_footnote(footnote: &Footnote, children: &str) -> String {
    let (outer, inner) = if footnote.margin {
        ("MarginOuter", "Marginal")
    } else {
        ("FootOuter", "HoverFoot")
    };
    let marker = tag(
        "span",
        &[("class", "SupFootMarker".to_string())],
        &format!("[{}]", footnote.number.as_deref().unwrap_or("")),
    );
    let hover = tag("span", &[("class", inner.to_string())], children);
    tag(
        "span",
        &[("class", outer.to_string())],
        &format!("{}{}", marker, hover),
    )
}

fn emit_float(float: &Float, children: &str) -> String {
    let class = if float.wrap { "float wrap" } else { "float" };
    let mut inner = vec![("class", float.float_type.clone())];
    if let Some(number) = &float.number {
        inner.push(("id", format!("{}-{}", float.float_type, number)));
    }
    block(
        "div",
        &[("class", class.to_string())],
        &block("div", &inner, children),
    )
}

fn emit_reference(reference: &Reference, ctx: &DocumentContext) -> String {
    let number = match ctx.xrefs.label(&reference.key) {
        Some(label) => label
            .number
            .clone()
            .unwrap_or_else(|| reference.key.clone()),
        None => "?".to_string(),
    };
    let text = reference
        .format
        .replace('@', &escape_text(&number))
        .replace('↕', reference.direction.arrow());
    tag(
        "a",
        &[
            ("class", "Reference".to_string()),
            ("href", format!("#{}", reference.key)),
        ],
        &text,
    )
}

fn emit_citation(citation: &Citation, ctx: &DocumentContext) -> String {
    let links: Vec<String> = citation
        .keys
        .iter()
        .map(|key| match ctx.bibliography.entry(key) {
            Some(entry) => tag(
                "a",
                &[
                    ("class", "bibliocite".to_string()),
                    ("href", format!("#bibitem-{}", key)),
                ],
                &escape_text(&entry.label),
            ),
            None => "?".to_string(),
        })
        .collect();
    tag(
        "span",
        &[
            ("class", "cite".to_string()),
            ("id", format!("cite-{}", citation.id)),
        ],
        &format!("[{}]", links.join(", ")),
    )
}

fn emit_bib_entry(key: &str, label: &str, ctx: &DocumentContext) -> String {
    let backlinks: Vec<String> = ctx
        .bibliography
        .entry(key)
        .map(|entry| {
            entry
                .citations
                .iter()
                .map(|(id, direction)| {
                    tag(
                        "a",
                        &[
                            ("class", "biblioback".to_string()),
                            ("href", format!("#cite-{}", id)),
                        ],
                        direction.arrow(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    let mut out = tag(
        "span",
        &[
            ("class", "bibitem".to_string()),
            ("id", format!("bibitem-{}", key)),
        ],
        &format!("[{}]", escape_text(label)),
    );
    for link in backlinks {
        out.push(' ');
        out.push_str(&link);
    }
    out.push(' ');
    out
}

fn index_slug(term: &str) -> String {
    let slug: String = term
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("index-term-{}", slug)
}

fn emit_index(ctx: &DocumentContext) -> String {
    let mut out = block(
        "h1",
        &[("class", "index".to_string())],
        &escape_text(&ctx.translate("index")),
    );
    let mut entries = String::from("\n");
    for (term, anchors) in ctx.index.sorted() {
        let links: Vec<String> = anchors
            .iter()
            .map(|anchor| tag("a", &[("href", format!("#{}", anchor))], "↑"))
            .collect();
        entries.push_str(&block(
            "div",
            &[
                ("class", "IndexEntry".to_string()),
                ("id", index_slug(term)),
            ],
            &format!("{}: {}", term, links.join(", ")),
        ));
    }
    out.push_str(&block(
        "div",
        &[("class", "PrintIndex".to_string())],
        &entries,
    ));
    out
}

fn emit_toc(ctx: &DocumentContext) -> String {
    let tocdepth = ctx.header.tocdepth.unwrap_or(3);
    let mut entries = String::from("\n");
    for entry in ctx
        .toc
        .iter()
        .filter(|entry| (entry.depth as i32) <= tocdepth + 1)
    {
        let text = match &entry.number {
            Some(number) => format!("{} {}", number, entry.title),
            None => entry.title.clone(),
        };
        entries.push_str(&block(
            "div",
            &[("class", format!("toc toc-{}", entry.depth))],
            &tag("a", &[("href", format!("#{}", entry.anchor))], &text),
        ));
    }
    let heading = block(
        "div",
        &[("class", "tocheader".to_string())],
        &escape_text(&ctx.translate("contents")),
    );
    block(
        "div",
        &[("class", "fulltoc".to_string())],
        &format!("\n{}{}", heading, entries),
    )
}

fn emit_listing(inline: bool, parameters: &Parameters, children: &str) -> String {
    let language = parameters
        .get("lstparams")
        .and_then(|params| params.as_text())
        .and_then(|params| {
            params
                .split(',')
                .find_map(|setting| setting.trim().strip_prefix("language="))
        });
    let class = match language {
        Some(language) => format!("listing {}", language.to_lowercase()),
        None => "listing".to_string(),
    };
    if inline {
        tag("span", &[("class", class)], children)
    } else {
        block("pre", &[("class", class)], children)
    }
}

fn emit_formula(formula: &Formula) -> String {
    let body = formula.root.render();
    if !formula.display {
        return tag("span", &[("class", "formula".to_string())], &body);
    }
    let number = formula
        .number
        .as_ref()
        .map(|number| {
            tag(
                "span",
                &[("class", "eqnumber".to_string())],
                &format!("({})", number),
            )
        })
        .unwrap_or_default();
    block(
        "div",
        &[("class", "formula".to_string())],
        &format!("{}{}", number, body),
    )
}

fn emit_image(image: &Image) -> String {
    let mut attributes = vec![
        ("class", "embedded".to_string()),
        ("src", image.destination.clone()),
        ("alt", format!("figure {}", image.source)),
    ];
    if let Some(width) = image.width {
        attributes.push(("width", width.to_string()));
    }
    if let Some(height) = image.height {
        attributes.push(("height", height.to_string()));
    }
    empty("img", &attributes)
}

/// A complete page around a rendered body
pub fn page(body: &str, ctx: &DocumentContext) -> String {
    let language = ctx
        .options
        .language
        .as_deref()
        .or(ctx.header.language.as_deref())
        .map(language_code)
        .unwrap_or_else(|| "en".to_string());
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&format!("<html lang=\"{}\">\n", escape_attribute(&language)));
    out.push_str("<head>\n");
    out.push_str("<meta charset=\"UTF-8\"/>\n");
    out.push_str("<meta name=\"generator\" content=\"lyx2html\"/>\n");
    out.push_str(&format!("<title>{}</title>\n", ctx.title()));
    for stylesheet in &ctx.options.css {
        out.push_str(&empty(
            "link",
            &[
                ("rel", "stylesheet".to_string()),
                ("href", stylesheet.clone()),
                ("type", "text/css".to_string()),
            ],
        ));
        out.push('\n');
    }
    out.push_str("</head>\n<body>\n<div id=\"globalWrapper\">\n");
    out.push_str(body);
    out.push_str("</div>\n</body>\n</html>\n");
    out
}
