//! Float and listing captions

use crate::lyx::assembling::Stage;
use crate::lyx::ast::tables::FLOAT_TYPES;
use crate::lyx::ast::{Container, Kind};
use crate::lyx::context::DocumentContext;

/// Numbers floats and captioned listings and prefixes their captions.
///
/// Labels written inside a caption move to the front of the float, so the anchor
/// lands before the caption text.
pub struct FloatStage;

fn is_caption(node: &Container) -> bool {
    matches!(node.kind, Kind::Caption)
}

fn is_label(node: &Container) -> bool {
    matches!(node.kind, Kind::Label { .. })
}

fn counter_of(node: &Container) -> Option<&str> {
    match &node.kind {
        Kind::Float(float) => Some(float.float_type.as_str()),
        Kind::Listing { inline: false } => Some("listing"),
        _ => None,
    }
}

/// Localized name shown before the number
fn float_name(counter: &str, ctx: &DocumentContext) -> String {
    if FLOAT_TYPES.contains(&counter) {
        return ctx.translate(counter);
    }
    let mut chars = counter.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Stage for FloatStage {
    fn name(&self) -> &'static str {
        "floats"
    }

    fn handles(&self, node: &Container) -> bool {
        counter_of(node).is_some()
    }

    fn process(&self, mut node: Container, siblings: &mut Vec<Container>, ctx: &mut DocumentContext) {
        let Some(counter) = counter_of(&node).map(str::to_string) else {
            siblings.push(node);
            return;
        };
        let listing = matches!(node.kind, Kind::Listing { .. });
        if listing && node.find_first_mut(&is_caption).is_none() {
            siblings.push(node);
            return;
        }

        let number = ctx.numbering.generate_chaptered(&counter);
        let name = float_name(&counter, ctx);
        let mut labels = Vec::new();
        if let Some(caption) = node.find_first_mut(&is_caption) {
            labels = caption.extract_all(&is_label);
            caption
                .children
                .insert(0, Container::constant(format!("{} {}: ", name, number)));
        }

        let mut keys: Vec<String> = labels.iter().flat_map(Container::label_keys).collect();
        keys.extend(node.find_all(&is_label).iter().flat_map(|l| l.label_keys()));
        for key in keys {
            ctx.xrefs.set_number(&key, &number);
        }
        log::debug!("{} {} at line {}", name, number, node.begin_line);

        node.children.splice(0..0, labels);
        if let Kind::Float(float) = &mut node.kind {
            float.number = Some(number);
        }
        siblings.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyx::ast::Float;

    fn label(key: &str) -> Container {
        Container::new(Kind::Label {
            key: key.to_string(),
        })
    }

    fn caption(children: Vec<Container>) -> Container {
        Container::new(Kind::Caption).with_children(children)
    }

    fn figure(children: Vec<Container>) -> Container {
        Container::new(Kind::Float(Float {
            float_type: "figure".to_string(),
            number: None,
            wrap: false,
        }))
        .with_children(vec![Container::new(Kind::Group).with_children(children)])
    }

    fn place(nodes: Vec<Container>, ctx: &mut DocumentContext) -> Vec<Container> {
        let mut siblings = Vec::new();
        for node in nodes {
            FloatStage.process(node, &mut siblings, ctx);
        }
        siblings
    }

    #[test]
    fn test_caption_label_moves_to_front() {
        let mut ctx = DocumentContext::default();
        ctx.xrefs.add_label("fig:plot");
        let placed = place(
            vec![figure(vec![caption(vec![
                Container::text("A plot"),
                label("fig:plot"),
            ])])],
            &mut ctx,
        );
        let float = &placed[0];
        assert_eq!(float.children[0], label("fig:plot"));
        assert_eq!(float.plain_text(), "Figure 1: A plot");
        assert_eq!(
            ctx.xrefs.label("fig:plot").and_then(|l| l.number.clone()),
            Some("1".to_string())
        );
    }

    #[test]
    fn test_floats_are_counted_per_type() {
        let mut ctx = DocumentContext::default();
        let table = Container::new(Kind::Float(Float {
            float_type: "table".to_string(),
            number: None,
            wrap: false,
        }));
        let placed = place(
            vec![figure(Vec::new()), table, figure(Vec::new())],
            &mut ctx,
        );
        let numbers: Vec<Option<String>> = placed
            .iter()
            .map(|node| match &node.kind {
                Kind::Float(float) => float.number.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(
            numbers,
            vec![
                Some("1".to_string()),
                Some("1".to_string()),
                Some("2".to_string())
            ]
        );
    }

    #[test]
    fn test_listing_without_caption_is_unnumbered() {
        let mut ctx = DocumentContext::default();
        let listing = Container::new(Kind::Listing { inline: false })
            .with_children(vec![Container::text("code")]);
        let placed = place(vec![listing.clone()], &mut ctx);
        assert_eq!(placed, vec![listing]);

        let captioned = Container::new(Kind::Listing { inline: false })
            .with_children(vec![caption(vec![Container::text("Main")])]);
        let placed = place(vec![captioned], &mut ctx);
        assert_eq!(placed[0].plain_text(), "Listing 1: Main");
    }

    #[test]
    fn test_unknown_float_type_is_capitalized() {
        let ctx = DocumentContext::default();
        assert_eq!(float_name("scheme", &ctx), "Scheme");
        assert_eq!(float_name("table", &ctx), "Table");
    }
}
