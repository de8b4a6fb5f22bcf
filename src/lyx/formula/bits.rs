//! Pieces of a parsed formula

use crate::lyx::ast::escape::escape_attribute;
use serde::Serialize;

/// What a bit is, for italicization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BitType {
    /// Letters and letter-like symbols, set in italics
    Alpha,
    Number,
    /// Explicitly styled content, left as is
    Font,
}

/// How a bit turns into HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BitOutput {
    /// Children only
    Contents,
    /// Children wrapped in a tag, e.g. `span class="fraction"`
    Tagged(String),
    /// Literal HTML, children ignored
    Fixed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaBit {
    pub bit_type: Option<BitType>,
    /// The source text this bit was parsed from
    pub original: String,
    pub output: BitOutput,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FormulaBit>,
    /// Key declared by `\label`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FormulaBit {
    fn with_output(output: BitOutput) -> Self {
        Self {
            bit_type: None,
            original: String::new(),
            output,
            children: Vec::new(),
            label: None,
        }
    }

    pub fn contents() -> Self {
        Self::with_output(BitOutput::Contents)
    }

    pub fn tagged(tag: impl Into<String>) -> Self {
        Self::with_output(BitOutput::Tagged(tag.into()))
    }

    /// Literal HTML standing for `original`
    pub fn constant(html: impl Into<String>, original: impl Into<String>) -> Self {
        let mut bit = Self::with_output(BitOutput::Fixed(html.into()));
        bit.original = original.into();
        bit
    }

    pub fn typed(mut self, bit_type: BitType) -> Self {
        self.bit_type = Some(bit_type);
        self
    }

    /// Append a child, extending the original text with its source
    pub fn add(&mut self, bit: FormulaBit) {
        self.original.push_str(&bit.original);
        self.children.push(bit);
    }

    /// Record source text consumed without producing a child
    pub fn add_original(&mut self, text: &str) {
        self.original.push_str(text);
    }

    pub fn render(&self) -> String {
        match &self.output {
            BitOutput::Fixed(html) => html.clone(),
            BitOutput::Contents => self.render_children(),
            BitOutput::Tagged(tag) => {
                let name = tag.split_whitespace().next().unwrap_or("span");
                format!("<{}>{}</{}>", tag, self.render_children(), name)
            }
        }
    }

    fn render_children(&self) -> String {
        self.children.iter().map(FormulaBit::render).collect()
    }

    /// Label keys declared anywhere inside
    pub fn labels(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.label.iter().cloned().collect();
        for child in &self.children {
            keys.extend(child.labels());
        }
        keys
    }

    /// Set alphabetic bits in italics, except inside explicitly styled bits
    pub fn italicize(&mut self) {
        for child in self.children.iter_mut() {
            match child.bit_type {
                Some(BitType::Font) => {}
                Some(BitType::Alpha) => {
                    let mut inner = std::mem::replace(child, FormulaBit::contents());
                    inner.bit_type = None;
                    let mut italic = FormulaBit::tagged("i");
                    italic.add(inner);
                    *child = italic;
                }
                _ => child.italicize(),
            }
        }
    }

    /// An anchor for a `\label`
    pub fn anchor(key: &str, original: impl Into<String>) -> Self {
        let mut bit = Self::with_output(BitOutput::Fixed(format!(
            "<a class=\"eqlabel\" id=\"{}\"></a>",
            escape_attribute(key)
        )));
        bit.original = original.into();
        bit.label = Some(key.to_string());
        bit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tagged_closes_with_tag_name() {
        let mut bit = FormulaBit::tagged("span class=\"fraction\"");
        bit.add(FormulaBit::constant("1", "1"));
        assert_eq!(bit.render(), "<span class=\"fraction\">1</span>");
        assert_eq!(bit.original, "1");
    }

    #[test]
    fn test_italicize_skips_font_bits() {
        let mut root = FormulaBit::contents();
        root.add(FormulaBit::constant("x", "x").typed(BitType::Alpha));
        let mut roman = FormulaBit::tagged("span class=\"mathrm\"").typed(BitType::Font);
        roman.add(FormulaBit::constant("d", "d").typed(BitType::Alpha));
        root.add(roman);
        root.add(FormulaBit::constant("2", "2").typed(BitType::Number));

        root.italicize();
        assert_eq!(
            root.render(),
            "<i>x</i><span class=\"mathrm\">d</span>2"
        );
        assert_eq!(root.original, "xd2");
    }

    #[test]
    fn test_labels_are_collected() {
        let mut root = FormulaBit::contents();
        root.add(FormulaBit::constant("E", "E"));
        root.add(FormulaBit::anchor("eq:energy", "\\label{eq:energy}"));
        assert_eq!(root.labels(), vec!["eq:energy".to_string()]);
    }
}
