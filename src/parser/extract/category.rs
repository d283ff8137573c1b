//! Category extraction.
//!
//! Four tiers: the platform selector battery (a union across every selector,
//! not a first-match scan), the inline script vars, `article:section` meta
//! tags, then a generic `.category` sweep. An empty result is valid; many
//! legacy documents genuinely carry no categories. Errors here mean the
//! extractor could not run at all.

use std::sync::LazyLock;

use regex::Regex;

use super::{collapse_whitespace, is_clean_label, script_var_blobs};
use crate::config::ParserConfig;
use crate::dom::{element_text, Document};
use crate::parser::strategy::{tiered_union, Attempt};

static SCRIPT_CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"categories\s*:\s*\[\s*\{\s*[^}]*name\s*:\s*'([^']*)'").unwrap()
});

pub fn extract(doc: &Document, config: &ParserConfig) -> Result<Vec<String>, String> {
    let tier_selectors: Vec<Attempt<'_, Vec<String>>> = config
        .category_selectors
        .iter()
        .map(|sel| {
            Attempt::new(sel.clone(), move || {
                Ok(selector_texts(doc, sel, config))
            })
        })
        .collect();

    let tier_script = vec![Attempt::new("script vars categories", || {
        Ok(script_categories(doc, config))
    })];

    let tier_meta = vec![Attempt::new("meta article:section", || {
        Ok(meta_sections(doc, config))
    })];

    let tier_sweep: Vec<Attempt<'_, Vec<String>>> = config
        .category_text_selectors
        .iter()
        .map(|sel| {
            Attempt::new(sel.clone(), move || {
                Ok(selector_texts(doc, sel, config))
            })
        })
        .collect();

    tiered_union(vec![tier_selectors, tier_script, tier_meta, tier_sweep])
}

/// Normalizes newlines/whitespace and strips one leading theme label
/// (`テーマ：` and friends, both colon widths).
pub fn clean(category: &str, config: &ParserConfig) -> String {
    let mut category = collapse_whitespace(category);
    for prefix in &config.category_prefixes {
        if let Some(rest) = category.strip_prefix(prefix.as_str()) {
            category = rest.to_string();
            break;
        }
    }
    category.trim().to_string()
}

fn selector_texts(doc: &Document, selector: &str, config: &ParserConfig) -> Vec<String> {
    let Ok(els) = doc.query(selector) else {
        return Vec::new();
    };
    els.iter()
        .map(|el| clean(&element_text(el), config))
        .filter(|c| is_clean_label(c))
        .collect()
}

fn script_categories(doc: &Document, config: &ParserConfig) -> Vec<String> {
    script_var_blobs(doc)
        .iter()
        .flat_map(|blob| {
            SCRIPT_CATEGORY_RE
                .captures_iter(blob)
                .map(|caps| caps[1].to_string())
                .collect::<Vec<_>>()
        })
        .map(|raw| clean(&raw, config))
        .filter(|c| is_clean_label(c))
        .collect()
}

fn meta_sections(doc: &Document, config: &ParserConfig) -> Vec<String> {
    let Ok(els) = doc.query("meta[property='article:section']") else {
        return Vec::new();
    };
    els.iter()
        .filter_map(|el| el.value().attr("content"))
        .map(|raw| clean(raw, config))
        .filter(|c| is_clean_label(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ParserConfig {
        ParserConfig::default()
    }

    #[test]
    fn tier_one_unions_across_selectors() {
        // Two distinct selectors matching different text: both values, in
        // first-seen order, deduplicated even when selectors overlap.
        let doc = Document::parse(
            r#"<body>
            <span class="skin-categoryLabel">料理</span>
            <dd class="article-category1">旅行</dd>
            <dd class="article-category2">旅行</dd>
            </body>"#,
        );
        assert_eq!(extract(&doc, &cfg()).unwrap(), vec!["料理", "旅行"]);
    }

    #[test]
    fn script_vars_only_when_selectors_miss() {
        let doc = Document::parse(
            r#"<script>ld_blog_vars = { articles: [ { categories : [ { name:'日常', id: 2 } ] } ] };</script>"#,
        );
        assert_eq!(extract(&doc, &cfg()).unwrap(), vec!["日常"]);

        let doc = Document::parse(
            r#"<body><span class="skin-categoryLabel">優先</span></body>
            <script>ld_blog_vars = { categories : [ { name:'無視' } ] };</script>"#,
        );
        assert_eq!(extract(&doc, &cfg()).unwrap(), vec!["優先"]);
    }

    #[test]
    fn meta_section_and_generic_sweep() {
        let doc = Document::parse(
            r#"<head><meta property="article:section" content="エッセイ"></head>"#,
        );
        assert_eq!(extract(&doc, &cfg()).unwrap(), vec!["エッセイ"]);

        let doc = Document::parse(r#"<body><div class="category">雑記</div></body>"#);
        assert_eq!(extract(&doc, &cfg()).unwrap(), vec!["雑記"]);
    }

    // Resolved contract: the final design treats "no categories" as valid,
    // unlike earlier revisions that made it fatal. Keep it that way.
    #[test]
    fn empty_result_is_valid() {
        let doc = Document::parse("<body><p>nothing categorical</p></body>");
        assert_eq!(extract(&doc, &cfg()).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn clean_strips_theme_labels_once() {
        let config = cfg();
        assert_eq!(clean("テーマ：子育て", &config), "子育て");
        assert_eq!(clean("テーマ:子育て", &config), "子育て");
        assert_eq!(clean("Theme：growth", &config), "growth");
        assert_eq!(clean("  a \n b ", &config), "a b");
    }

    #[test]
    fn invalid_labels_are_discarded() {
        let doc = Document::parse(
            r#"<body><span class="skin-categoryLabel">  </span>
            <span class="skin-categoryLabel">ok</span></body>"#,
        );
        assert_eq!(extract(&doc, &cfg()).unwrap(), vec!["ok"]);
    }
}
