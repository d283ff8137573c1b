pub mod category;
pub mod content;
pub mod date;
pub mod image;
pub mod tag;
pub mod title;

use crate::config::SCRIPT_VARS_MARKER;
use crate::dom::{element_text, Document};

/// Collapses every whitespace run (including newlines) to a single space and
/// trims the ends.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shared validation for short textual fields: non-empty, no raw angle
/// brackets, no control characters other than tab/CR/LF.
pub(crate) fn is_clean_label(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    if s.contains('<') || s.contains('>') {
        return false;
    }
    !s.chars()
        .any(|c| c < ' ' && c != '\t' && c != '\n' && c != '\r')
}

/// Text of every inline script blob carrying the platform metadata marker.
pub(crate) fn script_var_blobs(doc: &Document) -> Vec<String> {
    let Ok(scripts) = doc.query("script") else {
        return Vec::new();
    };
    scripts
        .iter()
        .map(element_text)
        .filter(|text| text.contains(SCRIPT_VARS_MARKER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_flattens_newlines() {
        assert_eq!(collapse_whitespace("  a\n\n b\tc  "), "a b c");
    }

    #[test]
    fn clean_label_rejects_markup_and_control_chars() {
        assert!(is_clean_label("ordinary label"));
        assert!(is_clean_label("tab\tand\nnewline ok"));
        assert!(!is_clean_label(""));
        assert!(!is_clean_label("<b>bold</b>"));
        assert!(!is_clean_label("bell\u{7}"));
    }

    #[test]
    fn script_blobs_require_the_marker() {
        let doc =
            Document::parse("<script>var other = 1;</script><script>ld_blog_vars = {};</script>");
        let blobs = script_var_blobs(&doc);
        assert_eq!(blobs.len(), 1);
        assert!(blobs[0].contains("ld_blog_vars"));
    }
}
