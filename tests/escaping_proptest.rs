//! Property-based tests for text escaping
//!
//! Text is escaped once, when its leaf is built. Postprocessing and emission must pass
//! it through untouched, so entities never come out double-escaped.

use lyx_html::lyx::ast::escape::{escape_text, substitute_line, unescape_text};
use lyx_html::lyx::testing::{layout, wrap_body};
use lyx_html::lyx::{ConversionOptions, DocumentLoader};
use proptest::prelude::*;

/// Words with HTML-significant characters, never starting a command or a tag
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z<>&]{0,10}",
        "[a-z][a-z&]{0,5}( [a-z<>&]{1,8}){1,3}",
        "[A-Z][a-z]{0,6} &amp; [a-z]{1,6}",
    ]
}

fn raw_html(text: &str) -> String {
    let mut options = ConversionOptions::default();
    options.raw = true;
    DocumentLoader::from_string(wrap_body(&layout("Standard", &[text])))
        .with_options(options)
        .to_html()
        .expect("conversion succeeds")
}

proptest! {
    #[test]
    fn test_text_is_escaped_exactly_once(text in text_strategy()) {
        let html = raw_html(&text);
        prop_assert_eq!(
            html.trim(),
            format!("<div class=\"Standard\">{}</div>", escape_text(&text))
        );
    }

    #[test]
    fn test_unescape_inverts_escape(text in "[a-z<>& ]{0,30}") {
        prop_assert_eq!(unescape_text(&escape_text(&text)), text);
    }

    #[test]
    fn test_plain_words_survive_substitution(text in "[a-zA-Z0-9 .,;:!?]{0,40}") {
        let substituted = substitute_line(&text);
        prop_assert_eq!(substituted.html, text);
        prop_assert!(!substituted.unknown_command);
    }
}
