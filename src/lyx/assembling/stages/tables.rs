//! Table cleanup: multicolumn cells and repeated long table rows

use crate::lyx::assembling::Stage;
use crate::lyx::ast::{Container, Kind};
use crate::lyx::context::DocumentContext;

pub struct TableStage;

fn flag(node: &Container, key: &str) -> bool {
    node.parameter_text(key) == Some("true")
}

/// A cell continuing the multicolumn run before it
fn is_continuation(cell: &Container) -> bool {
    matches!(cell.kind, Kind::Cell(_)) && cell.parameter_text("multicolumn") == Some("2")
}

/// Merge each run of continuation cells into one cell spanning the run
fn merge_cells(row: &mut Container) {
    let mut merged: Vec<Container> = Vec::with_capacity(row.children.len());
    let mut in_run = false;
    for cell in std::mem::take(&mut row.children) {
        let continues = is_continuation(&cell);
        match merged.last_mut() {
            Some(previous) if continues && in_run => {
                if let Kind::Cell(spanning) = &mut previous.kind {
                    spanning.colspan += 1;
                }
                previous.children.extend(cell.children);
            }
            _ => merged.push(cell),
        }
        in_run = continues;
    }
    row.children = merged;
}

/// Drop header and footer rows that a long table repeats on later pages
fn drop_repeated_rows(rows: &mut Vec<Container>) {
    let is_row = |node: &Container| matches!(node.kind, Kind::Row);
    let has_first_head = rows.iter().any(|r| is_row(r) && flag(r, "endfirsthead"));
    let has_last_foot = rows.iter().any(|r| is_row(r) && flag(r, "endlastfoot"));
    rows.retain(|row| {
        if !is_row(row) {
            return true;
        }
        let repeated_head =
            has_first_head && flag(row, "endhead") && !flag(row, "endfirsthead");
        let repeated_foot =
            has_last_foot && flag(row, "endfoot") && !flag(row, "endlastfoot");
        !(repeated_head || repeated_foot)
    });
}

/// Cells without their own alignment take their column's
fn fill_alignment(table: &mut Container) {
    let columns: Vec<Option<String>> = table
        .children
        .iter()
        .filter_map(|child| match &child.kind {
            Kind::Column { alignment } => Some(alignment.clone()),
            _ => None,
        })
        .collect();
    for row in table.children.iter_mut().filter(|c| matches!(c.kind, Kind::Row)) {
        let mut column = 0;
        for cell in row.children.iter_mut() {
            if let Kind::Cell(cell) = &mut cell.kind {
                if cell.alignment.is_none() {
                    cell.alignment = columns.get(column).cloned().flatten();
                }
                column += cell.colspan;
            }
        }
    }
}

impl Stage for TableStage {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn handles(&self, node: &Container) -> bool {
        matches!(node.kind, Kind::Table { .. })
    }

    fn process(&self, mut node: Container, siblings: &mut Vec<Container>, _: &mut DocumentContext) {
        for row in node.children.iter_mut().filter(|c| matches!(c.kind, Kind::Row)) {
            merge_cells(row);
        }
        if node.kind == (Kind::Table { long: true }) {
            drop_repeated_rows(&mut node.children);
        }
        fill_alignment(&mut node);
        siblings.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyx::ast::{Cell, ParameterValue};
    use rstest::rstest;

    fn with_params(mut node: Container, params: &[(&str, &str)]) -> Container {
        for (key, value) in params {
            node.parameters
                .insert(key.to_string(), ParameterValue::Text(value.to_string()));
        }
        node
    }

    fn cell(text: &str, multicolumn: Option<&str>) -> Container {
        let node = Container::new(Kind::Cell(Cell {
            colspan: 1,
            alignment: None,
        }))
        .with_children(vec![Container::text(text)]);
        match multicolumn {
            Some(value) => with_params(node, &[("multicolumn", value)]),
            None => node,
        }
    }

    fn spans(row: &Container) -> Vec<(String, usize)> {
        row.children
            .iter()
            .map(|c| match &c.kind {
                Kind::Cell(cell) => (c.plain_text(), cell.colspan),
                _ => (c.plain_text(), 0),
            })
            .collect()
    }

    fn run(table: Container) -> Container {
        let mut siblings = Vec::new();
        TableStage.process(table, &mut siblings, &mut DocumentContext::default());
        siblings.remove(0)
    }

    #[test]
    fn test_continuation_run_is_merged() {
        let row = Container::new(Kind::Row).with_children(vec![
            cell("A", Some("1")),
            cell("B", Some("2")),
            cell("C", Some("2")),
            cell("D", Some("1")),
        ]);
        let table = run(Container::new(Kind::Table { long: false }).with_children(vec![row]));
        assert_eq!(
            spans(&table.children[0]),
            vec![
                ("A".to_string(), 1),
                ("BC".to_string(), 2),
                ("D".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_plain_cells_are_untouched() {
        let row = Container::new(Kind::Row)
            .with_children(vec![cell("x", None), cell("y", None)]);
        let table = run(Container::new(Kind::Table { long: false }).with_children(vec![row]));
        assert_eq!(
            spans(&table.children[0]),
            vec![("x".to_string(), 1), ("y".to_string(), 1)]
        );
    }

    #[rstest]
    #[case(&[("endhead", "true")], false)]
    #[case(&[("endfirsthead", "true")], true)]
    #[case(&[("endhead", "true"), ("endfirsthead", "true")], true)]
    #[case(&[], true)]
    fn test_repeated_heads_are_dropped(#[case] params: &[(&str, &str)], #[case] kept: bool) {
        let first = with_params(Container::new(Kind::Row), &[("endfirsthead", "true")]);
        let candidate = with_params(
            Container::new(Kind::Row).with_children(vec![cell("c", None)]),
            params,
        );
        let table = run(
            Container::new(Kind::Table { long: true }).with_children(vec![first, candidate]),
        );
        let found = table.children.iter().any(|row| row.plain_text() == "c");
        assert_eq!(found, kept);
    }

    #[test]
    fn test_short_tables_keep_all_rows() {
        let rows = vec![
            with_params(Container::new(Kind::Row), &[("endfirsthead", "true")]),
            with_params(Container::new(Kind::Row), &[("endhead", "true")]),
        ];
        let table = run(Container::new(Kind::Table { long: false }).with_children(rows));
        assert_eq!(table.children.len(), 2);
    }

    #[test]
    fn test_cells_take_column_alignment() {
        let columns = vec![
            Container::new(Kind::Column {
                alignment: Some("left".to_string()),
            }),
            Container::new(Kind::Column {
                alignment: Some("right".to_string()),
            }),
        ];
        let row = Container::new(Kind::Row)
            .with_children(vec![cell("a", None), cell("b", None)]);
        let mut children = columns;
        children.push(row);
        let table = run(Container::new(Kind::Table { long: false }).with_children(children));
        let alignments: Vec<Option<String>> = table.children[2]
            .children
            .iter()
            .map(|c| match &c.kind {
                Kind::Cell(cell) => cell.alignment.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(
            alignments,
            vec![Some("left".to_string()), Some("right".to_string())]
        );
    }
}
