//! The block grammar
//!
//! Lines are dispatched by a [`NodeTypeRegistry`] to a [`NodeType`], read according to
//! the type's [`ParseStyle`] by the [`ContainerParser`], and finalized by
//! [`process_node`]. The result is a tree of [`Container`]s ready for postprocessing.

pub mod node_type;
pub mod parser;
pub mod process;
pub mod registry;

pub use node_type::{NodeType, ParseStyle};
pub use parser::{ContainerParser, ParsedNode};
pub use process::process_node;
pub use registry::NodeTypeRegistry;

use crate::lyx::ast::Container;
use crate::lyx::context::DocumentContext;
use crate::lyx::error::ParserResult;

/// Parse a complete LyX source with the standard registry
pub fn parse_document(source: &str, ctx: &mut DocumentContext) -> ParserResult<Container> {
    ContainerParser::new(source, ctx).parse_document()
}
