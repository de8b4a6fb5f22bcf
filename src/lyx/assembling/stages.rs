//! Individual postprocessing stages
//!
//! Each stage implements [`Stage`](super::Stage) for one family of node kinds.

pub mod floats;
pub mod layouts;
pub mod numbering;
pub mod tables;

pub use floats::FloatStage;
pub use layouts::{BibliographyStage, CodeStage, ListStage, StandardStage};
pub use numbering::{AppendixStage, EquationStage, FootnoteStage, HeadingStage, LabelStage};
pub use tables::TableStage;
