//! Image extraction and lead-image selection.
//!
//! og:image wins, then twitter:image, then the first inline `<img>` with a
//! usable URL (`data-src` preferred over `src` for lazy-loaded images).
//! Absence is valid: the lead image degrades to an empty string.

use url::Url;

use crate::config::ParserConfig;
use crate::dom::{element_text, Document};
use crate::model::ImageInfo;
use scraper::ElementRef;

/// Every usable image in the document: the meta-tag candidates first, then
/// inline images in document order.
pub fn extract_images(doc: &Document, config: &ParserConfig) -> Vec<ImageInfo> {
    let mut images = Vec::new();

    if let Some(og) = doc.meta_content("meta[property='og:image']") {
        let url = normalize_url(&og, config);
        if !url.is_empty() {
            images.push(ImageInfo {
                url,
                alt: "OGP Image".to_string(),
                width: String::new(),
                height: String::new(),
                description: doc
                    .meta_content("meta[property='og:description']")
                    .unwrap_or_default(),
            });
        }
    }

    if images.is_empty() {
        if let Some(tw) = doc.meta_content("meta[name='twitter:image']") {
            let url = normalize_url(&tw, config);
            if !url.is_empty() {
                images.push(ImageInfo {
                    url,
                    alt: "Twitter Card Image".to_string(),
                    width: String::new(),
                    height: String::new(),
                    description: doc
                        .meta_content("meta[name='twitter:description']")
                        .unwrap_or_default(),
                });
            }
        }
    }

    let inline = doc.query("img").unwrap_or_default();
    for img in inline {
        let raw = img
            .value()
            .attr("data-src")
            .filter(|v| !v.is_empty())
            .or_else(|| img.value().attr("src"))
            .unwrap_or_default();
        let url = normalize_url(raw, config);
        if url.is_empty() {
            continue;
        }
        images.push(ImageInfo {
            url,
            alt: img.value().attr("alt").unwrap_or_default().to_string(),
            width: img.value().attr("width").unwrap_or_default().to_string(),
            height: img.value().attr("height").unwrap_or_default().to_string(),
            description: figure_caption(&img),
        });
    }

    images
}

/// The representative lead image, or empty when the document has none.
pub fn first_image(doc: &Document, config: &ParserConfig) -> String {
    extract_images(doc, config)
        .first()
        .map(|img| img.url.clone())
        .unwrap_or_default()
}

/// Rejects empty, `data:` and malformed URLs; relative URLs pass through
/// untouched (exports reference same-host assets that way). On recognized
/// CDN hosts the `_s.`/`_m.` small-size markers are stripped once to recover
/// the original-resolution URL.
pub fn normalize_url(raw: &str, config: &ParserConfig) -> String {
    if raw.is_empty() || raw.starts_with("data:") {
        return String::new();
    }
    let parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => return raw.to_string(),
        Err(_) => return String::new(),
    };
    let host = parsed.host_str().unwrap_or_default();
    if config.image_cdn_hosts.iter().any(|cdn| host.contains(cdn.as_str())) {
        return raw.replacen("_s.", ".", 1).replacen("_m.", ".", 1);
    }
    raw.to_string()
}

fn figure_caption(img: &ElementRef<'_>) -> String {
    let Some(parent) = img.parent().and_then(ElementRef::wrap) else {
        return String::new();
    };
    if parent.value().name() != "figure" {
        return String::new();
    }
    let Ok(sel) = scraper::Selector::parse("figcaption") else {
        return String::new();
    };
    parent
        .select(&sel)
        .next()
        .map(|cap| element_text(&cap).trim().to_string())
        .unwrap_or_default()
}
