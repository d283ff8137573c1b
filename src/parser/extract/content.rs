//! Body content extraction.
//!
//! A genuine fallback search, not a union: ranked platform containers first,
//! then `main`, then `body` as last resort. Every failed candidate is kept as
//! a diagnostic so a total miss reports the whole trail.

use crate::config::ParserConfig;
use crate::dom::Document;
use crate::parser::strategy::{first_hit, Attempt, Diagnostic};

/// Minimum content size after normalization, in Unicode code points.
pub const MIN_CONTENT_CHARS: usize = 100;

pub fn extract(doc: &Document, config: &ParserConfig) -> Result<String, Vec<Diagnostic>> {
    let mut attempts: Vec<Attempt<'_, String>> = config
        .content_selectors
        .iter()
        .map(|sel| Attempt::new(sel.clone(), move || candidate(doc, sel)))
        .collect();
    attempts.push(Attempt::new("main", || candidate(doc, "main")));
    attempts.push(Attempt::new("body", || candidate(doc, "body")));
    first_hit(attempts)
}

/// CRLF/CR to LF, per-line trim, blank lines dropped, ends trimmed. Applying
/// it twice is a no-op.
pub fn normalize_html(html: &str) -> String {
    let html = html.replace("\r\n", "\n").replace('\r', "\n");
    html.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn is_valid(content: &str) -> bool {
    content.chars().count() >= MIN_CONTENT_CHARS
}

fn candidate(doc: &Document, selector: &str) -> Result<String, String> {
    let el = doc
        .query_first(selector)?
        .ok_or_else(|| "not found".to_string())?;
    let content = normalize_html(&el.inner_html());
    if content.is_empty() {
        return Err("empty".to_string());
    }
    if !is_valid(&content) {
        return Err(format!("too short ({} chars)", content.chars().count()));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ParserConfig {
        ParserConfig::default()
    }

    fn long_text(n: usize) -> String {
        "あ".repeat(n)
    }

    #[test]
    fn platform_container_beats_main_and_body() {
        let html = format!(
            "<body><div class='skin-entryBody'>{}</div><main>{}</main></body>",
            long_text(120),
            long_text(150),
        );
        let doc = Document::parse(&html);
        assert_eq!(extract(&doc, &cfg()).unwrap(), long_text(120));
    }

    #[test]
    fn too_short_candidates_fall_through() {
        // article is present but under the minimum; main wins.
        let html = format!(
            "<body><article>short</article><main>{}</main></body>",
            long_text(100)
        );
        let doc = Document::parse(&html);
        assert_eq!(extract(&doc, &cfg()).unwrap(), long_text(100));
    }

    #[test]
    fn boundary_is_exactly_100_chars() {
        assert!(!is_valid(&long_text(99)));
        assert!(is_valid(&long_text(100)));

        // Body is the only candidate: 99 chars rejected, 100 accepted.
        let doc = Document::parse(&format!("<body>{}</body>", long_text(99)));
        assert!(extract(&doc, &cfg()).is_err());

        let doc = Document::parse(&format!("<body>{}</body>", long_text(100)));
        assert_eq!(extract(&doc, &cfg()).unwrap(), long_text(100));
    }

    #[test]
    fn total_miss_reports_every_attempt() {
        let doc = Document::parse("<body>tiny</body>");
        let trail = extract(&doc, &cfg()).unwrap_err();
        // all platform selectors + main + body
        assert_eq!(trail.len(), cfg().content_selectors.len() + 2);
        assert!(trail.iter().any(|d| d.label == "main" && d.reason == "not found"));
        assert!(trail
            .iter()
            .any(|d| d.label == "body" && d.reason.starts_with("too short")));
    }

    #[test]
    fn normalize_html_is_idempotent() {
        let input = "  line one \r\n\r\n  line two\r  \n\n line three  ";
        let once = normalize_html(input);
        assert_eq!(once, "line one\nline two\nline three");
        assert_eq!(normalize_html(&once), once);
    }
}
