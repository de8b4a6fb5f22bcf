//! Postprocessing of the parsed tree
//!
//!     Parsing finalizes each node on its own. What depends on a node's neighbours is
//!     done here: list items are grouped into lists, code lines are joined, headings,
//!     floats, footnotes and equations get their numbers, and labels learn the number
//!     they stand for.
//!
//!     The [`Postprocessor`] sweeps every sibling list left to right, after sweeping
//!     each node's own children (post-order). For each node the first [`Stage`] whose
//!     `handles` accepts it places the node into the output list, where it can look
//!     back at the siblings already placed and merge into them. A node a stage turns
//!     into something else is not offered to the other stages again.
//!
//!     Because the sweep visits nodes in document order, counters advance in document
//!     order too: a figure in chapter 2 is numbered after the chapter 2 heading, and an
//!     appendix marker inside a heading switches numbering before that heading gets its
//!     number.
//!
//! Current stages:
//!
//!     - `headings`: numbers headings, records them for the table of contents.
//!     - `appendix`: switches top-level numbers to letters.
//!     - `footnotes`, `equations`, `labels`: counters and label numbers.
//!     - `floats`: moves caption labels to the float front and numbers the caption.
//!     - `tables`: merges multicolumn cells and drops repeated long table rows.
//!     - `standard`, `lists`, `code`, `bibliography`: sibling grouping.

pub mod stages;

use crate::lyx::ast::Container;
use crate::lyx::context::DocumentContext;

pub use stages::{
    AppendixStage, BibliographyStage, CodeStage, EquationStage, FloatStage, FootnoteStage,
    HeadingStage, LabelStage, ListStage, StandardStage, TableStage,
};

/// One rewrite rule of the sweep
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    fn handles(&self, node: &Container) -> bool;

    /// Place `node` after the already processed `siblings`
    fn process(&self, node: Container, siblings: &mut Vec<Container>, ctx: &mut DocumentContext);
}

pub struct Postprocessor {
    stages: Vec<Box<dyn Stage>>,
}

impl Postprocessor {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// All stages in their fixed order
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(AppendixStage),
            Box::new(HeadingStage),
            Box::new(FootnoteStage),
            Box::new(EquationStage),
            Box::new(LabelStage),
            Box::new(FloatStage),
            Box::new(TableStage),
            Box::new(StandardStage),
            Box::new(ListStage),
            Box::new(CodeStage),
            Box::new(BibliographyStage),
        ])
    }

    /// Rewrite a whole tree, then check that every reference found its target
    pub fn postprocess(&self, mut root: Container, ctx: &mut DocumentContext) -> Container {
        let children = std::mem::take(&mut root.children);
        root.children = self.sweep(children, ctx);
        ctx.check_integrity();
        root
    }

    fn sweep(&self, children: Vec<Container>, ctx: &mut DocumentContext) -> Vec<Container> {
        let mut output = Vec::with_capacity(children.len());
        for mut child in children {
            let grandchildren = std::mem::take(&mut child.children);
            child.children = self.sweep(grandchildren, ctx);
            match self.stages.iter().find(|stage| stage.handles(&child)) {
                Some(stage) => {
                    log::trace!("{} handles line {}", stage.name(), child.begin_line);
                    stage.process(child, &mut output, ctx);
                }
                None => output.push(child),
            }
        }
        output
    }
}

impl Default for Postprocessor {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyx::ast::{Kind, TagSpec};

    struct Upper;

    impl Stage for Upper {
        fn name(&self) -> &'static str {
            "upper"
        }

        fn handles(&self, node: &Container) -> bool {
            matches!(node.kind, Kind::Text(_))
        }

        fn process(&self, node: Container, siblings: &mut Vec<Container>, _: &mut DocumentContext) {
            siblings.push(Container::text(node.plain_text().to_uppercase()));
        }
    }

    struct Collapse;

    impl Stage for Collapse {
        fn name(&self) -> &'static str {
            "collapse"
        }

        fn handles(&self, node: &Container) -> bool {
            matches!(node.kind, Kind::Tagged(_))
        }

        fn process(&self, node: Container, siblings: &mut Vec<Container>, _: &mut DocumentContext) {
            // children were already rewritten when the parent is seen
            siblings.push(Container::constant(node.plain_text()));
        }
    }

    #[test]
    fn test_children_are_swept_before_parents() {
        let root = Container::new(Kind::Group).with_children(vec![Container::new(
            Kind::Tagged(TagSpec::new("span")),
        )
        .with_children(vec![Container::text("inner")])]);
        let postprocessor = Postprocessor::new(vec![Box::new(Upper), Box::new(Collapse)]);
        let mut ctx = DocumentContext::default();
        let root = postprocessor.postprocess(root, &mut ctx);
        assert_eq!(root.children, vec![Container::constant("INNER")]);
    }

    #[test]
    fn test_unhandled_nodes_pass_through() {
        let root = Container::new(Kind::Group).with_children(vec![Container::new(Kind::Hidden)]);
        let mut ctx = DocumentContext::default();
        let root = Postprocessor::new(Vec::new()).postprocess(root, &mut ctx);
        assert_eq!(root.children, vec![Container::new(Kind::Hidden)]);
    }
}
