//! Thin adapter over the `scraper` HTML engine.
//!
//! Extractors only ever see this surface: query-by-selector, text and
//! attribute access. Selector strings come from injected config, so a bad
//! selector is reported as a value instead of panicking.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document, alive for one extraction pass.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses an HTML document. The underlying engine is error-recovering,
    /// so malformed markup still yields a tree.
    pub fn parse(input: &str) -> Self {
        Self {
            html: Html::parse_document(input),
        }
    }

    /// All elements matching `selector`, in document order.
    pub fn query(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, String> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).collect())
    }

    /// First element matching `selector`.
    pub fn query_first(&self, selector: &str) -> Result<Option<ElementRef<'_>>, String> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next())
    }

    /// Trimmed `content` attribute of the first matching element, typically a
    /// meta tag. Empty values count as absent.
    pub fn meta_content(&self, selector: &str) -> Option<String> {
        let el = self.query_first(selector).ok().flatten()?;
        let content = el.value().attr("content")?.trim().to_string();
        if content.is_empty() {
            None
        } else {
            Some(content)
        }
    }

    /// Serialization of the whole document.
    pub fn full_html(&self) -> String {
        self.html.html()
    }
}

/// Concatenated text of an element's subtree, the way goquery-style engines
/// report `.text()`.
pub fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

fn compile(selector: &str) -> Result<Selector, String> {
    Selector::parse(selector).map_err(|e| format!("invalid selector {selector:?}: {e}"))
}
