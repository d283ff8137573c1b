//! Tag extraction.
//!
//! Same tiered-union shape as categories: selector battery, script vars,
//! keywords meta, generic class sweep. Empty results are valid.

use std::sync::LazyLock;

use regex::Regex;

use super::{collapse_whitespace, is_clean_label, script_var_blobs};
use crate::config::ParserConfig;
use crate::dom::{element_text, Document};
use crate::parser::strategy::{tiered_union, Attempt};

static SCRIPT_TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tags\s*:\s*\[([^\]]*)\]").unwrap());
static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([^']*)'").unwrap());

pub fn extract(doc: &Document, config: &ParserConfig) -> Result<Vec<String>, String> {
    let tier_selectors: Vec<Attempt<'_, Vec<String>>> = config
        .tag_selectors
        .iter()
        .map(|sel| Attempt::new(sel.clone(), move || Ok(selector_texts(doc, sel, config))))
        .collect();

    let tier_script = vec![Attempt::new("script vars tags", || {
        Ok(script_tags(doc, config))
    })];

    let tier_keywords = vec![Attempt::new("meta keywords", || {
        Ok(keyword_tags(doc, config))
    })];

    let tier_sweep: Vec<Attempt<'_, Vec<String>>> = config
        .tag_text_selectors
        .iter()
        .map(|sel| Attempt::new(sel.clone(), move || Ok(selector_texts(doc, sel, config))))
        .collect();

    tiered_union(vec![tier_selectors, tier_script, tier_keywords, tier_sweep])
}

/// Strips configured boilerplate substrings and the generic blog label,
/// drops one leading `#`, and normalizes whitespace.
pub fn clean(tag: &str, config: &ParserConfig) -> String {
    let mut tag = tag.trim().to_string();
    for boilerplate in &config.tag_boilerplate {
        tag = tag.replace(boilerplate.as_str(), "");
    }
    let tag = tag.strip_prefix('#').unwrap_or(&tag);
    collapse_whitespace(tag)
}

fn selector_texts(doc: &Document, selector: &str, config: &ParserConfig) -> Vec<String> {
    let Ok(els) = doc.query(selector) else {
        return Vec::new();
    };
    els.iter()
        .map(|el| clean(&element_text(el), config))
        .filter(|t| is_clean_label(t))
        .collect()
}

fn script_tags(doc: &Document, config: &ParserConfig) -> Vec<String> {
    script_var_blobs(doc)
        .iter()
        .filter_map(|blob| SCRIPT_TAGS_RE.captures(blob))
        .flat_map(|caps| {
            let body = caps[1].to_string();
            QUOTED_RE
                .captures_iter(&body)
                .map(|q| q[1].to_string())
                .collect::<Vec<_>>()
        })
        .map(|raw| clean(&raw, config))
        .filter(|t| is_clean_label(t))
        .collect()
}

fn keyword_tags(doc: &Document, config: &ParserConfig) -> Vec<String> {
    let Some(keywords) = doc.meta_content("meta[name='keywords']") else {
        return Vec::new();
    };
    keywords
        .split(',')
        .map(|raw| clean(raw, config))
        .filter(|t| is_clean_label(t))
        .collect()
}
