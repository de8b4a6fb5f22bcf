//! Lookup tables for layouts, character styles and small insets

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// HTML tag for each named layout; unknown layouts become `div`
pub static LAYOUT_TAGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Title", "h1"),
        ("Author", "h2"),
        ("Date", "h2"),
        ("Part", "h1"),
        ("Chapter", "h1"),
        ("Section", "h2"),
        ("Subsection", "h3"),
        ("Subsubsection", "h4"),
        ("Paragraph", "div"),
        ("Subparagraph", "div"),
        ("Abstract", "div"),
        ("Quote", "blockquote"),
        ("Quotation", "blockquote"),
        ("Verse", "div"),
        ("Center", "div"),
        ("Address", "div"),
        ("Right_Address", "div"),
    ])
});

pub fn layout_tag(style: &str) -> &'static str {
    LAYOUT_TAGS
        .get(style.trim_end_matches('*'))
        .copied()
        .unwrap_or("div")
}

/// `\shape` values: tag and class
pub static SHAPES: Lazy<HashMap<&'static str, (&'static str, Option<&'static str>)>> =
    Lazy::new(|| {
        HashMap::from([
            ("italic", ("i", None)),
            ("slanted", ("i", Some("slanted"))),
            ("smallcaps", ("span", Some("versalitas"))),
        ])
    });

/// `\family` values: tag and class
pub static FAMILIES: Lazy<HashMap<&'static str, (&'static str, Option<&'static str>)>> =
    Lazy::new(|| {
        HashMap::from([
            ("sans", ("span", Some("sans"))),
            ("typewriter", ("tt", None)),
        ])
    });

/// Typographic quotes by LyX code: language, side, single or double
pub static QUOTES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("eld", "“"),
        ("erd", "”"),
        ("els", "‘"),
        ("ers", "’"),
        ("gld", "„"),
        ("grd", "“"),
        ("gls", "‚"),
        ("grs", "‘"),
        ("fld", "«"),
        ("frd", "»"),
        ("fls", "‹"),
        ("frs", "›"),
        ("sld", "”"),
        ("srd", "”"),
        ("sls", "’"),
        ("srs", "’"),
        ("pld", "„"),
        ("prd", "”"),
        ("pls", "‚"),
        ("prs", "’"),
        ("ald", "»"),
        ("ard", "«"),
        ("als", "›"),
        ("ars", "‹"),
    ])
});

/// Space insets; `\hfill{}` is handled as a fill instead
pub static SPACES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("~", "\u{00a0}"),
        ("\\space{}", "\u{00a0}"),
        ("\\thinspace{}", "\u{2009}"),
        ("\\negthinspace{}", ""),
        ("\\enskip{}", "\u{2002}"),
        ("\\enspace{}", "\u{2002}"),
        ("\\quad{}", "\u{2003}"),
        ("\\qquad{}", "\u{2003}\u{2003}"),
        ("\\hspace{}", "\u{2003}"),
        ("\\hspace*{}", "\u{2003}"),
    ])
});

/// Floating environments known by name
pub const FLOAT_TYPES: &[&str] = &["figure", "table", "algorithm", "listing"];

/// Page language codes for LyX language names
pub static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("english", "en"),
        ("american", "en"),
        ("british", "en"),
        ("german", "de"),
        ("ngerman", "de"),
        ("french", "fr"),
        ("spanish", "es"),
        ("italian", "it"),
        ("portuguese", "pt"),
        ("dutch", "nl"),
        ("catalan", "ca"),
        ("polish", "pl"),
        ("russian", "ru"),
        ("swedish", "sv"),
        ("danish", "da"),
        ("finnish", "fi"),
        ("czech", "cs"),
        ("greek", "el"),
        ("japanese", "ja"),
    ])
});

pub fn language_code(language: &str) -> String {
    LANGUAGES
        .get(language)
        .map(|code| code.to_string())
        .unwrap_or_else(|| language.chars().take(2).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_tags() {
        assert_eq!(layout_tag("Section"), "h2");
        assert_eq!(layout_tag("Section*"), "h2");
        assert_eq!(layout_tag("Theorem"), "div");
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(language_code("ngerman"), "de");
        assert_eq!(language_code("esperanto"), "es");
    }
}
