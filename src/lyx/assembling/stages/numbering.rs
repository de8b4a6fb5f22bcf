//! Numbers for headings, footnotes and equations, and the labels that take them

use crate::lyx::assembling::Stage;
use crate::lyx::ast::{Container, Kind, LayoutRole};
use crate::lyx::context::numbering::{is_unique, level_of, roman};
use crate::lyx::context::{DocumentContext, TocEntry};

/// `\start_of_appendix` switches top-level numbers to letters for good
pub struct AppendixStage;

impl Stage for AppendixStage {
    fn name(&self) -> &'static str {
        "appendix"
    }

    fn handles(&self, node: &Container) -> bool {
        matches!(node.kind, Kind::AppendixMarker)
    }

    fn process(&self, node: Container, siblings: &mut Vec<Container>, ctx: &mut DocumentContext) {
        ctx.numbering.start_appendix();
        siblings.push(node);
    }
}

/// Parts, chapters and sections
pub struct HeadingStage;

fn heading_level(node: &Container) -> Option<(String, Option<usize>)> {
    let layout = node.layout()?;
    if layout.role != LayoutRole::Named {
        return None;
    }
    let base = layout.base_style();
    if is_unique(base) {
        Some((base.to_string(), None))
    } else {
        level_of(base).map(|level| (base.to_string(), Some(level)))
    }
}

impl HeadingStage {
    fn number(&self, style: &str, level: Option<usize>, ctx: &mut DocumentContext) -> String {
        match level {
            None => roman(ctx.numbering.generate_unique(style)),
            Some(level) => ctx.numbering.generate_ordered(level),
        }
    }

    /// Text put before the heading's own content
    fn prefix(&self, style: &str, number: &str, ctx: &DocumentContext) -> Vec<Container> {
        match style {
            "Part" => vec![
                Container::constant(format!("{} {}", ctx.translate("part"), number)),
                Container::new(Kind::LineBreak),
            ],
            "Chapter" => {
                let name = if ctx.numbering.in_appendix() {
                    ctx.translate("appendix")
                } else {
                    ctx.translate("chapter")
                };
                vec![
                    Container::constant(format!("{} {}", name, number)),
                    Container::new(Kind::LineBreak),
                ]
            }
            _ => vec![Container::constant(format!("{} ", number))],
        }
    }
}

impl Stage for HeadingStage {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn handles(&self, node: &Container) -> bool {
        heading_level(node).is_some()
    }

    fn process(&self, mut node: Container, siblings: &mut Vec<Container>, ctx: &mut DocumentContext) {
        let Some((style, level)) = heading_level(&node) else {
            siblings.push(node);
            return;
        };
        let starred = node.layout().is_some_and(|l| l.is_starred());
        let numbered = !starred
            && match level {
                None => true,
                Some(level) => (level as i32) <= ctx.secnumdepth(),
            };

        let title = node.plain_text().trim().to_string();
        let anchor = format!("toc-{}", ctx.toc.len() + 1);
        let number = if numbered {
            Some(self.number(&style, level, ctx))
        } else {
            None
        };

        if let Some(number) = &number {
            for key in node.label_keys() {
                ctx.xrefs.set_number(&key, number);
            }
            ctx.last_number = Some(number.clone());
            let prefix = self.prefix(&style, number, ctx);
            node.children.splice(0..0, prefix);
        }

        ctx.toc.push(TocEntry {
            depth: level.map_or(0, |level| level + 1),
            style,
            number: number.clone(),
            title,
            anchor: anchor.clone(),
        });
        if let Some(layout) = node.layout_mut() {
            layout.number = number;
            layout.anchor = Some(anchor);
        }
        siblings.push(node);
    }
}

/// Footnotes and margin notes count on their own
pub struct FootnoteStage;

impl Stage for FootnoteStage {
    fn name(&self) -> &'static str {
        "footnotes"
    }

    fn handles(&self, node: &Container) -> bool {
        matches!(node.kind, Kind::Footnote(_))
    }

    fn process(&self, mut node: Container, siblings: &mut Vec<Container>, ctx: &mut DocumentContext) {
        if let Kind::Footnote(footnote) = &mut node.kind {
            let counter = if footnote.margin { "margin" } else { "footnote" };
            footnote.number = Some(ctx.numbering.generate_unique(counter).to_string());
        }
        siblings.push(node);
    }
}

/// Numbered display formulas get chaptered equation numbers
pub struct EquationStage;

impl Stage for EquationStage {
    fn name(&self) -> &'static str {
        "equations"
    }

    fn handles(&self, node: &Container) -> bool {
        matches!(node.kind, Kind::Formula(_))
    }

    fn process(&self, mut node: Container, siblings: &mut Vec<Container>, ctx: &mut DocumentContext) {
        if let Kind::Formula(formula) = &mut node.kind {
            let labels = formula.root.labels();
            if formula.display && formula.numbered {
                let number = ctx.numbering.generate_chaptered("equation");
                for key in &labels {
                    ctx.xrefs.set_number(key, &number);
                }
                formula.number = Some(number);
            } else if let Some(last) = &ctx.last_number {
                for key in &labels {
                    ctx.xrefs.default_number(key, last);
                }
            }
        }
        siblings.push(node);
    }
}

/// Labels outside numbered structures take the last heading number
pub struct LabelStage;

impl Stage for LabelStage {
    fn name(&self) -> &'static str {
        "labels"
    }

    fn handles(&self, node: &Container) -> bool {
        matches!(node.kind, Kind::Label { .. })
    }

    fn process(&self, node: Container, siblings: &mut Vec<Container>, ctx: &mut DocumentContext) {
        if let (Kind::Label { key }, Some(last)) = (&node.kind, &ctx.last_number) {
            ctx.xrefs.default_number(key, last);
        }
        siblings.push(node);
    }
}
