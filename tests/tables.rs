//! Tables converted from complete LyX sources

use lyx_html::lyx::formats::html::render;
use lyx_html::lyx::testing::{layout, text_inset, wrap_body};
use lyx_html::lyx::{Document, DocumentLoader, Kind};
use rstest::rstest;

fn cell(text: &str, attributes: &str) -> String {
    format!(
        "<cell {}>\n{}</cell>\n",
        attributes,
        text_inset("Text", &[], text)
    )
}

fn row(attributes: &str, cells: &[String]) -> String {
    let open = if attributes.is_empty() {
        "<row>".to_string()
    } else {
        format!("<row {}>", attributes)
    };
    format!("{}\n{}</row>\n", open, cells.concat())
}

fn tabular(features: &str, columns: usize, rows: &[String]) -> String {
    let mut out = format!(
        "\\begin_inset Tabular\n<lyxtabular version=\"3\" rows=\"{}\" columns=\"{}\">\n<features {}>\n",
        rows.len(),
        columns,
        features
    );
    for _ in 0..columns {
        out.push_str("<column alignment=\"left\" valignment=\"top\">\n");
    }
    out.push_str(&rows.concat());
    out.push_str("</lyxtabular>\n\n\\end_inset\n");
    out
}

fn convert(table: &str) -> Document {
    DocumentLoader::from_string(wrap_body(&layout("Standard", &[table])))
        .parse()
        .expect("conversion succeeds")
}

fn cells(doc: &Document) -> Vec<(String, usize)> {
    doc.root
        .find_all(&|node| matches!(node.kind, Kind::Cell(_)))
        .into_iter()
        .filter_map(|node| match &node.kind {
            Kind::Cell(cell) => Some((node.plain_text(), cell.colspan)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_multicolumn_continuation_is_merged() {
    let table = tabular(
        "tabularvalignment=\"middle\"",
        4,
        &[row(
            "",
            &[
                cell("A", "alignment=\"center\" valignment=\"top\""),
                cell("B", "multicolumn=\"2\" alignment=\"center\" valignment=\"top\""),
                cell("C", "multicolumn=\"2\" alignment=\"center\" valignment=\"top\""),
                cell("D", "alignment=\"center\" valignment=\"top\""),
            ],
        )],
    );
    let doc = convert(&table);
    assert_eq!(
        cells(&doc),
        vec![
            ("A".to_string(), 1),
            ("BC".to_string(), 2),
            ("D".to_string(), 1)
        ]
    );
    let html = render(&doc.root, &doc.context);
    assert!(html.contains(r#"<td class="cell" colspan="2" style="text-align: center;">BC</td>"#));
    assert_eq!(html.matches("<td").count(), 3);
}

#[test]
fn test_cells_without_alignment_take_the_column() {
    let table = tabular(
        "tabularvalignment=\"middle\"",
        2,
        &[row(
            "",
            &[
                cell("x", "valignment=\"top\""),
                cell("y", "alignment=\"right\" valignment=\"top\""),
            ],
        )],
    );
    let html = render(&convert(&table).root, &Default::default());
    assert!(html.contains(r#"<td class="cell" style="text-align: left;">x</td>"#));
    assert!(html.contains(r#"<td class="cell" style="text-align: right;">y</td>"#));
}

#[rstest]
#[case("islongtable=\"true\"", vec!["first head", "body"])]
#[case("tabularvalignment=\"middle\"", vec!["first head", "repeated head", "body"])]
fn test_long_table_heads(#[case] features: &str, #[case] expected: Vec<&str>) {
    let table = tabular(
        features,
        1,
        &[
            row(
                "endhead=\"true\" endfirsthead=\"true\"",
                &[cell("first head", "valignment=\"top\"")],
            ),
            row("endhead=\"true\"", &[cell("repeated head", "valignment=\"top\"")]),
            row("", &[cell("body", "valignment=\"top\"")]),
        ],
    );
    let doc = convert(&table);
    let texts: Vec<String> = cells(&doc).into_iter().map(|(text, _)| text).collect();
    assert_eq!(texts, expected);
}
