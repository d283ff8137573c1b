//! Title extraction.
//!
//! Strategy order: inline platform script vars, og:title, first h1, the
//! document title element, then a generic title meta tag. A missing title is
//! fatal for the whole parse.

use std::sync::LazyLock;

use regex::Regex;

use super::{collapse_whitespace, is_clean_label, script_var_blobs};
use crate::config::ParserConfig;
use crate::dom::{element_text, Document};
use crate::parser::strategy::{first_hit, Attempt};

static SCRIPT_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"articles\s*:\s*\[\s*\{\s*[^}]*title\s*:\s*'([^']*)'").unwrap()
});

pub fn extract(doc: &Document) -> Option<String> {
    let attempts = vec![
        Attempt::new("script vars", || hit(script_title(doc))),
        Attempt::new("meta og:title", || {
            hit(doc.meta_content("meta[property='og:title']"))
        }),
        Attempt::new("first h1", || hit(element_trimmed(doc, "h1"))),
        Attempt::new("title element", || hit(element_trimmed(doc, "title"))),
        Attempt::new("meta title", || hit(doc.meta_content("meta[name='title']"))),
    ];
    first_hit(attempts).ok()
}

/// Flattens newlines, collapses whitespace and strips configured boilerplate
/// suffixes.
pub fn clean(title: &str, config: &ParserConfig) -> String {
    let mut title = collapse_whitespace(title);
    for boilerplate in &config.title_boilerplate {
        title = title.replace(boilerplate.as_str(), "");
    }
    title.trim().to_string()
}

pub fn is_valid(title: &str) -> bool {
    is_clean_label(title)
}

fn script_title(doc: &Document) -> Option<String> {
    script_var_blobs(doc).iter().find_map(|blob| {
        SCRIPT_TITLE_RE
            .captures(blob)
            .map(|caps| caps[1].trim().to_string())
    })
}

fn element_trimmed(doc: &Document, selector: &str) -> Option<String> {
    let el = doc.query_first(selector).ok().flatten()?;
    Some(element_text(&el).trim().to_string())
}

fn hit(value: Option<String>) -> Result<String, String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| "not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_vars_beat_og_title() {
        // Valid answers at two tiers: only the higher-priority one may win.
        let doc = Document::parse(
            r#"<html><head>
            <script>ld_blog_vars = { articles : [ { title:'Script Title', id: 1 } ] };</script>
            <meta property="og:title" content="OG Title">
            </head><body></body></html>"#,
        );
        assert_eq!(extract(&doc).as_deref(), Some("Script Title"));
    }

    #[test]
    fn og_title_beats_h1() {
        let doc = Document::parse(
            r#"<head><meta property="og:title" content="OG Title"></head>
            <body><h1>Heading Title</h1></body>"#,
        );
        assert_eq!(extract(&doc).as_deref(), Some("OG Title"));
    }

    #[test]
    fn falls_through_h1_title_and_meta() {
        let doc = Document::parse("<body><h1> Heading </h1></body>");
        assert_eq!(extract(&doc).as_deref(), Some("Heading"));

        let doc = Document::parse("<head><title>Doc Title</title></head>");
        assert_eq!(extract(&doc).as_deref(), Some("Doc Title"));

        let doc = Document::parse("<head><meta name='title' content='Meta Title'></head>");
        assert_eq!(extract(&doc).as_deref(), Some("Meta Title"));
    }

    #[test]
    fn missing_title_is_none() {
        let doc = Document::parse("<body><p>no title anywhere</p></body>");
        assert_eq!(extract(&doc), None);
    }

    #[test]
    fn clean_collapses_whitespace_and_strips_boilerplate() {
        let config = ParserConfig {
            title_boilerplate: vec![" | some blog".to_string()],
            ..ParserConfig::default()
        };
        assert_eq!(clean("  a\n title | some blog ", &config), "a title");
    }

    #[test]
    fn validation_rejects_markup() {
        assert!(is_valid("plain title"));
        assert!(!is_valid(""));
        assert!(!is_valid("<script>t</script>"));
        assert!(!is_valid("ding\u{7}"));
    }
}
