//! Grouping of sibling paragraphs

use crate::lyx::assembling::Stage;
use crate::lyx::ast::{Container, Kind, LayoutRole, TagSpec};
use crate::lyx::context::DocumentContext;

fn is_standard(node: &Container) -> bool {
    node.layout()
        .is_some_and(|l| matches!(l.role, LayoutRole::Standard { .. }))
}

/// A standard paragraph right after another one is indented, unless `\noindent`
pub struct StandardStage;

impl Stage for StandardStage {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn handles(&self, node: &Container) -> bool {
        is_standard(node)
    }

    fn process(&self, mut node: Container, siblings: &mut Vec<Container>, _: &mut DocumentContext) {
        let follows_paragraph = siblings.last().is_some_and(is_standard);
        let noindent = node
            .children
            .iter()
            .any(|child| child.header.first().map(String::as_str) == Some("\\noindent"));
        if let Some(layout) = node.layout_mut() {
            layout.role = LayoutRole::Standard {
                indented: follows_paragraph && !noindent,
            };
        }
        siblings.push(node);
    }
}

/// Consecutive list items of one kind become a list; a deeper block after a list
/// nests inside its last item
pub struct ListStage;

fn list_item_kind(node: &Container) -> Option<bool> {
    match node.layout()?.role {
        LayoutRole::ListItem { ordered } => Some(ordered),
        _ => None,
    }
}

impl Stage for ListStage {
    fn name(&self) -> &'static str {
        "lists"
    }

    fn handles(&self, node: &Container) -> bool {
        list_item_kind(node).is_some() || matches!(node.kind, Kind::Deeper)
    }

    fn process(&self, node: Container, siblings: &mut Vec<Container>, _: &mut DocumentContext) {
        let previous_list = siblings.last_mut().filter(|last| matches!(last.kind, Kind::List { .. }));

        let Some(ordered) = list_item_kind(&node) else {
            // a deeper block
            match previous_list.and_then(|list| list.children.last_mut()) {
                Some(item) => item.children.extend(node.children),
                None => siblings.push(node),
            }
            return;
        };

        match previous_list {
            Some(list) if list.kind == (Kind::List { ordered }) => list.children.push(node),
            _ => {
                let line = node.begin_line;
                siblings.push(
                    Container::new(Kind::List { ordered })
                        .with_children(vec![node])
                        .at_line(line),
                );
            }
        }
    }
}

/// Consecutive code paragraphs are joined into one block, one line each
pub struct CodeStage;

impl Stage for CodeStage {
    fn name(&self) -> &'static str {
        "code"
    }

    fn handles(&self, node: &Container) -> bool {
        node.has_role(LayoutRole::Code)
    }

    fn process(&self, node: Container, siblings: &mut Vec<Container>, _: &mut DocumentContext) {
        match siblings.last_mut() {
            Some(previous) if previous.has_role(LayoutRole::Code) => {
                previous.children.push(Container::constant("\n"));
                previous.children.extend(node.children);
            }
            _ => siblings.push(node),
        }
    }
}

/// The first bibliography entry of a sibling list gets a heading before it
pub struct BibliographyStage;

fn is_bibliography_heading(node: &Container) -> bool {
    matches!(&node.kind, Kind::Tagged(spec) if spec.class.as_deref() == Some("biblio"))
}

impl Stage for BibliographyStage {
    fn name(&self) -> &'static str {
        "bibliography"
    }

    fn handles(&self, node: &Container) -> bool {
        node.has_role(LayoutRole::Bibliography)
    }

    fn process(&self, node: Container, siblings: &mut Vec<Container>, ctx: &mut DocumentContext) {
        if !siblings.iter().any(is_bibliography_heading) {
            let heading = Container::new(Kind::Tagged(
                TagSpec::new("h1").with_class("biblio").block(),
            ))
            .with_children(vec![Container::constant(ctx.translate("references"))])
            .at_line(node.begin_line);
            siblings.push(heading);
        }
        siblings.push(node);
    }
}
