//! Reading LyX sources line by line
//!
//! The line grammar never looks at more than the current line. [`cursor::LineCursor`]
//! walks the lines and caches the whitespace split of the current one, and
//! [`parameters`] tokenizes the parameter lines found at the top of insets and in
//! table markup.

pub mod cursor;
pub mod parameters;

pub use cursor::LineCursor;
pub use parameters::{parse_key_value, parse_xml_tag, ParameterToken, XmlTag};
