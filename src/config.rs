//! Read-only configuration injected into the parser and the summarizer.
//!
//! Everything here is fixed at construction time; the defaults carry the
//! platform-specific tables (ameblo, livedoor, excite, fc2 and generic blog
//! engines) the extraction pipelines were tuned against.

/// Marker string identifying the inline script blob that some platforms embed
/// article metadata into.
pub const SCRIPT_VARS_MARKER: &str = "ld_blog_vars";

#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Body container candidates, most specific first. `main` and `body` are
    /// appended as generic fallbacks by the content extractor.
    pub content_selectors: Vec<String>,
    /// Category tier-1 battery; all selectors are scanned and unioned.
    pub category_selectors: Vec<String>,
    /// Generic category class sweep (tier 4).
    pub category_text_selectors: Vec<String>,
    /// Tag tier-1 battery.
    pub tag_selectors: Vec<String>,
    /// Generic tag class sweep (tier 4).
    pub tag_text_selectors: Vec<String>,
    /// Suffixes stripped from extracted titles.
    pub title_boilerplate: Vec<String>,
    /// Leading labels stripped from categories (full/half-width colons).
    pub category_prefixes: Vec<String>,
    /// Substrings removed from tags wherever they appear.
    pub tag_boilerplate: Vec<String>,
    /// Elements removed from the extracted content before summarization.
    pub remove_selectors: Vec<String>,
    /// Scoped removals: within each container selector, the listed child
    /// selectors are removed. Global removal of share buttons would be too
    /// aggressive outside the entry body.
    pub scoped_remove: Vec<(String, Vec<String>)>,
    /// Image CDN hosts where `_s.`/`_m.` small-size markers are stripped.
    pub image_cdn_hosts: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            content_selectors: to_strings(&[
                "div.article-body-inner",
                "div.skin-entryBody",
                "div.articleText",
                "div.post-main",
                "div.post-body",
                "div.entry-content",
                "div.POST_BODY",
                "article",
                "[itemprop='articleBody']",
                ".entry-content",
                ".post-content",
                ".article-content",
                "#content",
                "#main-content",
                ".content",
            ]),
            category_selectors: to_strings(&[
                // ameblo
                ".skin-categoryLabel",
                "[data-uranus-component='theme']",
                ".skin-entryThemes a",
                ".skin-categoryTag",
                "[data-analytics-index-name='theme'] span",
                "div.theme a",
                ".skinTheme",
                "li.theme a",
                ".subHeader-theme",
                "a.theme-link",
                // livedoor
                "dd.article-category1",
                "dd.article-category2",
                // excite
                ".POST_TAIL .TIME a[href*='/i']",
                ".articleTheme",
                // generic engines
                "a[rel='category']",
                ".category a",
                ".cat-links a",
                ".entry-categories a",
                ".post-categories a",
                "[itemprop='articleSection']",
                ".tags a",
                "a[rel='category tag']",
            ]),
            category_text_selectors: to_strings(&[".category"]),
            tag_selectors: to_strings(&[
                ".skin-tagLabel",
                ".skin-entryTags a",
                ".skin-tag",
                ".tag a",
                ".tags a",
                ".entry-tags a",
                ".post-tags a",
                ".blog-tags a",
                ".article-tags a",
                ".taglist a",
                ".entryTag a",
                ".entry_tag a",
                ".blogTag a",
                ".blog_tag a",
                ".label a",
                ".labels a",
                ".post-labels a",
                ".post_label a",
                ".entry-labels a",
                ".entry_label a",
                ".tagcloud a",
                ".tagCloud a",
                ".tag-list a",
                ".tagList a",
                ".tag_links a",
                ".tagLinks a",
                ".tag a[rel='tag']",
                ".hashtag-module__item__text",
            ]),
            tag_text_selectors: to_strings(&[".tag", ".tags", ".entry-tags", ".post-tags"]),
            title_boilerplate: to_strings(&[" | 心理カウンセラー・中井亜紀『成長の記録』"]),
            category_prefixes: to_strings(&["テーマ：", "テーマ:", "Theme：", "Theme:"]),
            tag_boilerplate: to_strings(&["心理カウンセラー・中井亜紀『成長の記録』", "ブログ"]),
            remove_selectors: to_strings(&[
                "script",
                "style",
                "iframe",
                ".google-auto-placed",
                "dl.article-tags",
                "div.blogroll1",
                "div.rss2-title",
                "a[href*='newresu1.blog.fc2.com']",
                "div.ad-entry-bottom",
                "div.POST_TAIL",
                "hr[style*='191970']",
            ]),
            scoped_remove: vec![(
                ".skin-entryBody, .skin-entryBody2".to_string(),
                to_strings(&[
                    ".google-auto-placed",
                    ".adsbygoogle",
                    ".blogroll-ad",
                    ".social-btn",
                    ".share-btn",
                    ".twitter-share-button",
                ]),
            )],
            image_cdn_hosts: to_strings(&["ameblo.jp", "ameba.jp"]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// BM25 term-frequency saturation.
    pub k1: f64,
    /// BM25 length normalization.
    pub b: f64,
    /// Sentences selected for the summary.
    pub top_sentences: usize,
    /// Summary cap in Unicode code points.
    pub max_chars: usize,
    /// Appended when the summary is truncated; counted inside `max_chars`.
    pub ellipsis: String,
    /// Exact part-of-speech weights, e.g. 名詞-固有名詞.
    pub pos_weights: Vec<(String, f64)>,
    /// Coarse-category fallbacks matched by prefix; unmatched tokens drop.
    pub pos_prefix_weights: Vec<(String, f64)>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            top_sentences: 2,
            max_chars: 300,
            ellipsis: "・・・".to_string(),
            pos_weights: vec![
                ("名詞-固有名詞".to_string(), 2.0),
                ("名詞-一般".to_string(), 1.5),
                ("動詞-自立".to_string(), 1.2),
                ("形容詞-自立".to_string(), 1.2),
                ("副詞-一般".to_string(), 0.8),
                ("名詞-副詞可能".to_string(), 0.7),
            ],
            pos_prefix_weights: vec![
                ("名詞".to_string(), 1.0),
                ("動詞".to_string(), 0.9),
                ("形容詞".to_string(), 0.9),
            ],
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_populated() {
        let cfg = ParserConfig::default();
        assert!(cfg.content_selectors.len() >= 10);
        assert!(cfg.category_selectors.len() >= 20);
        assert!(cfg.tag_selectors.len() >= 25);
        assert!(!cfg.remove_selectors.is_empty());
    }

    #[test]
    fn default_bm25_constants() {
        let cfg = SummaryConfig::default();
        assert_eq!(cfg.k1, 1.2);
        assert_eq!(cfg.b, 0.75);
        assert_eq!(cfg.max_chars, 300);
        assert_eq!(cfg.ellipsis.chars().count(), 3);
    }
}
