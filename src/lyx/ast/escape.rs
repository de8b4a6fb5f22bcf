//! Escaping of source text
//!
//! Text lines are escaped exactly once, when their leaf container is built. HTML
//! entities come first, then typographic character replacements, then the inline
//! commands LyX writes inside text lines.

/// Escape the three characters that are significant in HTML text
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Undo [`escape_text`]
pub fn unescape_text(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Escape a value placed inside a double-quoted attribute
pub fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

const CHARACTER_REPLACEMENTS: &[(&str, &str)] = &[
    (" --- ", " — "),
    (" -- ", " – "),
    ("``", "“"),
    ("''", "”"),
    ("`", "‘"),
    ("'", "’"),
];

const COMMAND_REPLACEMENTS: &[(&str, &str)] = &[
    ("\\SpecialChar \\ldots{}", "…"),
    ("\\SpecialChar \\@.", "."),
    ("\\SpecialChar \\-", "\u{00ad}"),
    ("\\SpecialChar \\textcompwordmark{}", ""),
    ("\\SpecialChar \\menuseparator", "▷"),
    ("\\SpecialChar \\slash{}", "/"),
    ("\\SpecialChar \\nobreakdash-", "\u{2011}"),
    ("\\SpecialChar ldots", "…"),
    ("\\SpecialChar endofsentence", "."),
    ("\\SpecialChar softhyphen", "\u{00ad}"),
    ("\\SpecialChar ligaturebreak", ""),
    ("\\SpecialChar menuseparator", "▷"),
    ("\\SpecialChar slash", "/"),
    ("\\SpecialChar nobreakdash", "\u{2011}"),
    ("\\SpecialChar LyX", "LyX"),
    ("\\SpecialChar TeX", "TeX"),
    ("\\SpecialChar LaTeX2e", "LaTeX2ε"),
    ("\\SpecialChar LaTeX", "LaTeX"),
    ("\\InsetSpace ~", "\u{00a0}"),
    ("\\InsetSpace \\space{}", "\u{00a0}"),
    ("\\InsetSpace \\thinspace{}", "\u{2009}"),
    ("\\InsetSpace \\quad{}", "\u{2003}"),
    ("\\InsetSpace \\qquad{}", "\u{2003}\u{2003}"),
    ("\\InsetSpace \\enskip{}", "\u{2002}"),
    ("\\backslash", "\\"),
];

/// The result of substituting one text line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    pub html: String,
    /// A backslash command survived substitution
    pub unknown_command: bool,
}

/// Turn one source text line into escaped HTML text
pub fn substitute_line(line: &str) -> Substituted {
    let mut html = escape_text(line);
    for (from, to) in CHARACTER_REPLACEMENTS {
        if html.contains(from) {
            html = html.replace(from, to);
        }
    }
    let mut unknown_command = false;
    if html.contains('\\') {
        // \backslash is last so the backslash it produces is not read as a command
        let mut remaining = html.clone();
        for (from, _) in COMMAND_REPLACEMENTS {
            remaining = remaining.replace(from, "");
        }
        unknown_command = remaining.contains('\\') && remaining.trim().len() > 1;
        for (from, to) in COMMAND_REPLACEMENTS {
            html = html.replace(from, to);
        }
    }
    Substituted {
        html,
        unknown_command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_entities_then_replacements() {
        let result = substitute_line("a < b && c -- d");
        assert_eq!(result.html, "a &lt; b &amp;&amp; c – d");
        assert!(!result.unknown_command);
    }

    #[rstest]
    #[case("a --- b", "a — b")]
    #[case("a--b", "a--b")]
    #[case("a---b", "a---b")]
    #[case("http://x--y.org", "http://x--y.org")]
    fn test_dashes_need_spaces(#[case] line: &str, #[case] html: &str) {
        assert_eq!(substitute_line(line).html, html);
    }

    #[test]
    fn test_special_chars() {
        assert_eq!(substitute_line("\\SpecialChar \\ldots{}").html, "…");
        assert_eq!(substitute_line("\\SpecialChar LaTeX2e").html, "LaTeX2ε");
        assert_eq!(substitute_line("\\backslash").html, "\\");
    }

    #[test]
    fn test_backslash_output_is_not_a_command() {
        let result = substitute_line("\\backslash emph");
        assert_eq!(result.html, "\\ emph");
        assert!(!result.unknown_command);
    }

    #[test]
    fn test_unknown_command_is_flagged() {
        let result = substitute_line("\\foo bar");
        assert!(result.unknown_command);
        assert_eq!(result.html, "\\foo bar");
    }

    #[test]
    fn test_quotes() {
        assert_eq!(substitute_line("``quoted''").html, "“quoted”");
        assert_eq!(substitute_line("it's").html, "it’s");
    }

    #[test]
    fn test_attribute_escaping() {
        assert_eq!(escape_attribute("a\"b<c"), "a&quot;b&lt;c");
    }

    proptest! {
        #[test]
        fn escaped_text_has_no_raw_markup(text in "[a-zA-Z0-9 <>&]{0,40}") {
            let escaped = escape_text(&text);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            let unescaped = escaped
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&amp;", "&");
            prop_assert_eq!(unescaped, text);
        }
    }
}
