//! Document tree types and text escaping

pub mod container;
pub mod escape;
pub mod tables;

pub use container::{
    BibEntry, Cell, Citation, Container, Direction, Float, Footnote, Formula, Image, Kind,
    Layout, LayoutRole, ParameterValue, Parameters, Reference, TagSpec,
};
