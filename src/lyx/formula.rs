//! The formula grammar
//!
//! Formula insets hold TeX math. It is parsed character by character into a tree of
//! [`FormulaBit`]s that renders to HTML with CSS classes, not MathML.

pub mod arrays;
pub mod bits;
pub mod commands;
pub mod factory;
pub mod position;
pub mod tables;

pub use bits::{BitOutput, BitType, FormulaBit};
pub use factory::{CommentRecognizer, FormulaFactory, ParsedFormula, Recognizer};
pub use position::TextPosition;
