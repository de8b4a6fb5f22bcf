//! Array environments: `\begin{name} ... \end{name}`
//!
//! Rows end at `\\` and cells at `&`. Both separators are pushed as optional endings so
//! that a cell also stops at the row separator or at `\end{name}`, whichever comes
//! first; the environment's own ending is required.

use super::bits::FormulaBit;
use super::factory::FormulaFactory;
use super::position::TextPosition;
use super::tables::{EnvironmentTemplate, ENVIRONMENTS};

const ROW_SEPARATOR: &str = "\\\\";
const CELL_SEPARATOR: &str = "&";

pub fn parse_environment(
    command: &str,
    factory: &FormulaFactory,
    pos: &mut TextPosition,
) -> FormulaBit {
    let name = factory.parse_literal(pos).unwrap_or_default();
    let mut environment = FormulaBit::contents();
    environment.add_original(&format!("{}{{{}}}", command, name));

    let base = name.trim_end_matches('*');
    let fallback = EnvironmentTemplate {
        alignments: "c",
        left: "",
        right: "",
        class: "array",
    };
    let template = match ENVIRONMENTS.get(base) {
        Some(template) => template,
        None => {
            pos.error(format!("Unknown environment {}", name));
            &fallback
        }
    };

    let mut alignments: Vec<char> = template.alignments.chars().collect();
    if base == "array" || base == "alignat" || base == "subarray" {
        // \begin{array}[t]{lcr}
        if let Some(position) = factory.parse_square(pos) {
            environment.add_original(&position.original);
        }
        if let Some(columns) = factory.parse_literal(pos) {
            environment.add_original(&format!("{{{}}}", columns));
            let parsed: Vec<char> = columns
                .chars()
                .filter(|c| matches!(c, 'l' | 'c' | 'r'))
                .collect();
            if !parsed.is_empty() && base != "alignat" {
                alignments = parsed;
            }
        }
    }

    let ending = format!("\\end{{{}}}", name);
    pos.push_ending(ending.as_str(), false);

    let mut array = FormulaBit::tagged(format!("span class=\"array {}\"", template.class));
    for row in parse_rows(factory, pos, &alignments) {
        array.add(row);
    }

    if !template.left.is_empty() {
        environment.add(FormulaBit::constant(
            format!("<span class=\"bracket\">{}</span>", template.left),
            "",
        ));
    }
    environment.add(array);
    if !template.right.is_empty() {
        environment.add(FormulaBit::constant(
            format!("<span class=\"bracket\">{}</span>", template.right),
            "",
        ));
    }

    let closed = pos.pop_ending(&ending);
    environment.add_original(&closed);
    environment
}

fn parse_rows(factory: &FormulaFactory, pos: &mut TextPosition, alignments: &[char]) -> Vec<FormulaBit> {
    let mut rows = Vec::new();
    loop {
        pos.push_ending(ROW_SEPARATOR, true);
        let mut row = parse_row(factory, pos, alignments);
        if pos.checkfor(ROW_SEPARATOR) {
            let separator = pos.pop_ending(ROW_SEPARATOR);
            row.add_original(&separator);
            rows.push(row);
        } else {
            pos.discard_ending();
            // a trailing \\ leaves an empty last row
            if !(is_empty_row(&row) && !rows.is_empty()) {
                rows.push(row);
            }
            break;
        }
        if pos.at_end() {
            break;
        }
    }
    rows
}

fn parse_row(factory: &FormulaFactory, pos: &mut TextPosition, alignments: &[char]) -> FormulaBit {
    let mut row = FormulaBit::tagged("span class=\"arrayrow\"");
    let mut index = 0;
    loop {
        pos.push_ending(CELL_SEPARATOR, true);
        let alignment = alignments
            .get(index % alignments.len().max(1))
            .copied()
            .unwrap_or('c');
        let mut cell = FormulaBit::tagged(format!("span class=\"arraycell align-{}\"", alignment));
        cell.add(factory.parse_whole(pos));
        row.add(cell);
        index += 1;
        if pos.checkfor(CELL_SEPARATOR) {
            let separator = pos.pop_ending(CELL_SEPARATOR);
            row.add_original(&separator);
        } else {
            pos.discard_ending();
            break;
        }
    }
    row
}

fn is_empty_row(row: &FormulaBit) -> bool {
    row.children.len() == 1 && row.original.trim().is_empty()
}
