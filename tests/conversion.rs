//! End-to-end conversions of complete LyX sources through `DocumentLoader`

use insta::assert_snapshot;
use lyx_html::lyx::formats::html::render;
use lyx_html::lyx::testing::{
    heading_numbers, label, layout, layouts, reference, reference_arrows, wrap_body,
};
use lyx_html::lyx::{ConversionOptions, Document, DocumentLoader, Kind};

fn convert(body: &str) -> Document {
    DocumentLoader::from_string(wrap_body(body))
        .parse()
        .expect("conversion succeeds")
}

fn some(numbers: &[&str]) -> Vec<Option<String>> {
    numbers.iter().map(|n| Some(n.to_string())).collect()
}

#[test]
fn test_chapter_resets_section_counter() {
    let body: String = [
        ("Chapter", "Start"),
        ("Section", "One"),
        ("Section", "Two"),
        ("Chapter", "Next"),
        ("Section", "Three"),
    ]
    .iter()
    .map(|(style, title)| layout(style, &[title]))
    .collect();
    let doc = convert(&body);
    assert_eq!(heading_numbers(&doc.root, "Chapter"), some(&["1", "2"]));
    assert_eq!(
        heading_numbers(&doc.root, "Section"),
        some(&["1.1", "1.2", "2.1"])
    );
    let titles: Vec<&str> = doc.context.toc.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Start", "One", "Two", "Next", "Three"]);
}

#[test]
fn test_appendix_switches_to_letters_for_good() {
    let body = format!(
        "{}{}{}{}",
        layout("Section", &["One"]),
        layout("Section", &["Two"]),
        layout("Section", &["\\start_of_appendix", "Extra"]),
        layout("Section", &["More"]),
    );
    let doc = convert(&body);
    assert_eq!(
        heading_numbers(&doc.root, "Section"),
        some(&["1", "2", "A", "B"])
    );
}

#[test]
fn test_secnumdepth_from_options() {
    let mut options = ConversionOptions::default();
    options.secnumdepth = Some(1);
    let body = format!(
        "{}{}",
        layout("Section", &["Top"]),
        layout("Subsection", &["Below"]),
    );
    let doc = DocumentLoader::from_string(wrap_body(&body))
        .with_options(options)
        .parse()
        .unwrap();
    assert_eq!(heading_numbers(&doc.root, "Section"), some(&["1"]));
    assert_eq!(heading_numbers(&doc.root, "Subsection"), vec![None]);
}

#[test]
fn test_reference_before_label_points_down() {
    let body = format!(
        "{}{}",
        layout("Standard", &["See ", &reference("a")]),
        layout("Section", &[&label("a"), "Target"]),
    );
    let doc = convert(&body);
    assert_eq!(reference_arrows(&doc.root), vec!["↓"]);
    let entry = doc.context.xrefs.label("a").unwrap();
    assert_eq!(entry.references, vec![0]);
    assert!(doc.context.xrefs.reference(0).unwrap().resolved);
    assert!(!doc.diagnostics().has_code("undefined-reference"));
}

#[test]
fn test_reference_after_label_points_up() {
    let body = format!(
        "{}{}",
        layout("Section", &[&label("b"), "Target"]),
        layout("Standard", &["See ", &reference("b")]),
    );
    let doc = convert(&body);
    assert_eq!(reference_arrows(&doc.root), vec!["↑"]);
    let html = render(&doc.root, &doc.context);
    assert!(html.contains(r##"<a class="Reference" href="#b">1↑</a>"##));
}

#[test]
fn test_undefined_reference_is_reported_and_shown() {
    let doc = convert(&layout("Standard", &[&reference("ghost")]));
    assert!(doc.diagnostics().has_code("undefined-reference"));
    let html = render(&doc.root, &doc.context);
    assert!(html.contains(r##"href="#ghost">?↓</a>"##));
}

#[test]
fn test_unknown_formula_command_degrades() {
    let body = format!(
        "{}{}",
        layout(
            "Standard",
            &["\\begin_inset Formula $\\notarealcommand+x$", "\\end_inset"],
        ),
        layout("Standard", &["after"]),
    );
    let doc = convert(&body);
    let html = render(&doc.root, &doc.context);
    assert!(html.contains(r#"<span class="unknown">\notarealcommand</span>"#));
    assert!(html.contains("<i>x</i>"));
    assert!(html.contains(r#"<div class="Standard">after</div>"#));
    assert!(doc.diagnostics().has_code("formula"));
}

#[test]
fn test_formula_diagnostic_points_at_its_line() {
    let body = layout(
        "Standard",
        &["\\begin_inset Formula $\\notarealcommand$", "\\end_inset"],
    );
    let loader = DocumentLoader::from_string(wrap_body(&body));
    let doc = loader.parse().expect("conversion succeeds");
    let diagnostic = doc
        .diagnostics()
        .with_code("formula")
        .next()
        .expect("formula diagnostic");
    let described = diagnostic.describe("paper.lyx", loader.source());
    assert!(described.starts_with("paper.lyx: warning [line "));
    let marked = described
        .lines()
        .find(|line| line.starts_with(">>"))
        .expect("marked source line");
    assert!(marked.ends_with("| \\begin_inset Formula $\\notarealcommand$"));
}

#[test]
fn test_heading_render() {
    let doc = convert(&layout("Section", &["Intro"]));
    let section = layouts(&doc.root, "Section")[0];
    assert_snapshot!(render(section, &doc.context).trim_end(), @r#"<h2 class="Section"><a class="toc" id="toc-1"></a>1 Intro</h2>"#);
}

#[test]
fn test_items_are_grouped_into_lists() {
    let body = format!(
        "{}{}{}",
        layout("Enumerate", &["first"]),
        layout("Enumerate", &["second"]),
        layout("Standard", &["closing"]),
    );
    let doc = convert(&body);
    let lists = doc
        .root
        .find_all(&|node| matches!(node.kind, Kind::List { ordered: true }));
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].children.len(), 2);
}

#[test]
fn test_full_page() {
    let html = lyx_html::lyx::convert(&wrap_body(&layout("Standard", &["a < b"]))).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<html lang=\"en\""));
    assert!(html.contains("<div class=\"Standard\">a &lt; b</div>"));
}
