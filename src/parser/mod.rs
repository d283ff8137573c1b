//! Parsing pipeline: per-document state machine and the batch driver.
//!
//! Title, content, cleaning and summarization are fatal stages; categories,
//! tags, publication date and the lead image are best-effort and degrade to
//! empty values. One document failing never affects another.

pub mod clean;
pub mod extract;
pub mod strategy;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::{ParserConfig, SummaryConfig};
use crate::dom::Document;
use crate::error::ParseError;
use crate::model::BlogPost;
use crate::summary::tokenizer::{CharClassTokenizer, Tokenize};
use crate::summary::Summarizer;

/// Batch chunk size; bounds rayon's work queue on very large exports.
const CHUNK_SIZE: usize = 500;

/// Cooperative cancellation handle shared between the batch driver and its
/// caller. Cancelling stops new documents from starting; documents already
/// parsed keep their results.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One file's result in a batch run.
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: Result<BlogPost, ParseError>,
}

/// Everything a batch run produced, in input order.
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// True when at least one document was attempted and none survived.
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.succeeded() == 0
    }
}

pub struct Parser {
    config: ParserConfig,
    summarizer: Summarizer,
    cancel: CancelToken,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default(), SummaryConfig::default())
    }

    pub fn with_config(config: ParserConfig, summary: SummaryConfig) -> Self {
        Self::with_tokenizer(config, summary, Arc::new(CharClassTokenizer::new()))
    }

    pub fn with_tokenizer(
        config: ParserConfig,
        summary: SummaryConfig,
        tokenizer: Arc<dyn Tokenize>,
    ) -> Self {
        Self {
            config,
            summarizer: Summarizer::new(summary, tokenizer),
            cancel: CancelToken::new(),
        }
    }

    /// IPA-dictionary morphological backend for the summarizer. Construction
    /// fails when the dictionary cannot be loaded.
    #[cfg(feature = "lindera")]
    pub fn with_morphology(
        config: ParserConfig,
        summary: SummaryConfig,
    ) -> Result<Self, ParseError> {
        let tokenizer = crate::summary::tokenizer::LinderaTokenizer::new()
            .map_err(ParseError::TokenizerUnavailable)?;
        Ok(Self::with_tokenizer(config, summary, Arc::new(tokenizer)))
    }

    /// Handle for cancelling batch runs from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Every usable image in the document, meta-tag candidates first. For
    /// archival consumers that want more than the lead image.
    pub fn extract_images(&self, html: &str) -> Vec<crate::model::ImageInfo> {
        let doc = Document::parse(html);
        extract::image::extract_images(&doc, &self.config)
    }

    /// Parses one HTML document into a post. The slug is left empty; callers
    /// that know the source assign it.
    pub fn parse(&self, html: &str) -> Result<BlogPost, ParseError> {
        if self.cancel.is_cancelled() {
            return Err(ParseError::Cancelled);
        }
        if html.trim().is_empty() {
            return Err(ParseError::DocumentParse("empty document".to_string()));
        }
        let doc = Document::parse(html);

        let title = extract::title::extract(&doc).ok_or(ParseError::TitleNotFound)?;
        let title = extract::title::clean(&title, &self.config);
        if !extract::title::is_valid(&title) {
            return Err(ParseError::InvalidTitle(title));
        }

        let content = extract::content::extract(&doc, &self.config).map_err(|trail| {
            ParseError::ContentNotFound {
                attempts: trail.iter().map(|d| d.to_string()).collect(),
            }
        })?;
        let content = clean::clean(&content, &self.config)?;

        // Last checkpoint before the expensive stage; past it the parse runs
        // to completion.
        if self.cancel.is_cancelled() {
            return Err(ParseError::Cancelled);
        }
        let summary = self.summarizer.summarize(&content)?;

        // Cleaning can shrink a candidate below the minimum.
        if !extract::content::is_valid(&content) {
            return Err(ParseError::InvalidContent {
                len: content.chars().count(),
            });
        }

        // Best-effort fields from here on.
        let categories = extract::category::extract(&doc, &self.config).unwrap_or_else(|reason| {
            warn!(error = %ParseError::CategoryExtraction(reason), "degrading to empty categories");
            Vec::new()
        });
        let tags = extract::tag::extract(&doc, &self.config).unwrap_or_else(|reason| {
            warn!(error = %ParseError::TagExtraction(reason), "degrading to empty tags");
            Vec::new()
        });
        let created_at = extract::date::extract(&doc);
        if created_at.is_none() {
            debug!(%title, "no publication date found");
        }
        let first_image = extract::image::first_image(&doc, &self.config);

        Ok(BlogPost {
            title,
            content,
            summary,
            categories,
            tags,
            created_at,
            first_image,
            slug: String::new(),
        })
    }

    /// Parses one file; the slug is the file stem. Checked for cancellation
    /// before the input is opened.
    pub fn parse_file(&self, path: &Path) -> Result<BlogPost, ParseError> {
        if self.cancel.is_cancelled() {
            return Err(ParseError::Cancelled);
        }
        let html = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut post = self.parse(&html)?;
        post.slug = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(post)
    }

    /// Parses a batch of files in parallel. `on_done` fires once per file as
    /// its outcome is known, from worker threads. Cancellation between chunks
    /// drops the remaining files from the report entirely; inside a chunk the
    /// per-document check marks them `Cancelled`.
    pub fn parse_files<F>(&self, paths: &[PathBuf], on_done: F) -> BatchReport
    where
        F: Fn(&BatchOutcome) + Sync,
    {
        let mut outcomes = Vec::with_capacity(paths.len());
        for chunk in paths.chunks(CHUNK_SIZE) {
            if self.cancel.is_cancelled() {
                break;
            }
            let chunk_outcomes: Vec<BatchOutcome> = chunk
                .par_iter()
                .map(|path| {
                    let outcome = BatchOutcome {
                        path: path.clone(),
                        result: self.parse_file(path),
                    };
                    on_done(&outcome);
                    outcome
                })
                .collect();
            outcomes.extend(chunk_outcomes);
        }
        BatchReport { outcomes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_text(n: usize) -> String {
        "あ".repeat(n)
    }

    fn full_doc() -> String {
        format!(
            r#"<html><head>
            <title>Doc Title | site</title>
            <meta property="og:title" content="OG Title">
            <meta property="og:image" content="http://x/img.jpg">
            <meta name="date" content="2023/07/25">
            </head><body>
            <div class="skin-entryBody">{}</div>
            <span class="skin-categoryLabel">日常</span>
            </body></html>"#,
            body_text(150)
        )
    }

    #[test]
    fn full_pipeline_assembles_a_post() {
        let post = Parser::new().parse(&full_doc()).unwrap();
        assert_eq!(post.title, "OG Title");
        assert_eq!(post.content.chars().count(), 150);
        assert_eq!(post.summary, post.content);
        assert_eq!(post.categories, vec!["日常"]);
        assert!(post.tags.is_empty());
        assert_eq!(
            post.created_at.unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2023-07-25 00:00:00"
        );
        assert_eq!(post.first_image, "http://x/img.jpg");
        assert_eq!(post.slug, "");
    }

    #[test]
    fn empty_input_fails_before_extraction() {
        assert!(matches!(
            Parser::new().parse("   \n  "),
            Err(ParseError::DocumentParse(_))
        ));
    }

    #[test]
    fn missing_title_is_fatal() {
        let html = format!("<body><p>{}</p></body>", body_text(150));
        assert!(matches!(
            Parser::new().parse(&html),
            Err(ParseError::TitleNotFound)
        ));
    }

    #[test]
    fn short_content_reports_the_attempt_trail() {
        let err = Parser::new()
            .parse("<body><h1>T</h1><p>too short</p></body>")
            .unwrap_err();
        match err {
            ParseError::ContentNotFound { attempts } => {
                assert!(attempts.iter().any(|a| a.starts_with("body:")));
            }
            other => panic!("expected ContentNotFound, got {other:?}"),
        }
    }

    #[test]
    fn cleaning_can_invalidate_content() {
        // The scripts push the raw extraction over the minimum; after
        // cleaning only the short paragraph remains.
        let html = format!(
            "<body><h1>T</h1><main><p>tiny</p><script>{}</script></main></body>",
            "x();".repeat(50)
        );
        assert!(matches!(
            Parser::new().parse(&html),
            Err(ParseError::InvalidContent { .. })
        ));
    }

    #[test]
    fn best_effort_fields_degrade_silently() {
        let html = format!("<body><h1>T</h1><main>{}</main></body>", body_text(120));
        let post = Parser::new().parse(&html).unwrap();
        assert!(post.categories.is_empty());
        assert!(post.tags.is_empty());
        assert!(post.created_at.is_none());
        assert_eq!(post.first_image, "");
    }

    #[test]
    fn cancelled_parser_refuses_new_documents() {
        let parser = Parser::new();
        parser.cancel_token().cancel();
        assert!(matches!(
            parser.parse(&full_doc()),
            Err(ParseError::Cancelled)
        ));
    }

    #[test]
    fn cancellation_precedes_file_open() {
        // A cancelled parser must refuse the file before touching the
        // filesystem, so even a missing path reports Cancelled, not Io.
        let parser = Parser::new();
        parser.cancel_token().cancel();
        assert!(matches!(
            parser.parse_file(Path::new("/nonexistent/entry.html")),
            Err(ParseError::Cancelled)
        ));
    }

    #[test]
    fn batch_isolates_failures() {
        let dir = std::env::temp_dir().join(format!("blogparser-batch-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.html");
        let bad = dir.join("bad.html");
        let missing = dir.join("missing.html");
        fs::write(&good, full_doc()).unwrap();
        fs::write(&bad, "<body>no title, no content</body>").unwrap();

        let report = Parser::new().parse_files(
            &[good.clone(), bad.clone(), missing.clone()],
            |_| {},
        );
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 2);
        assert!(!report.all_failed());

        let ok = report
            .outcomes
            .iter()
            .find(|o| o.path == good)
            .unwrap()
            .result
            .as_ref()
            .unwrap();
        assert_eq!(ok.slug, "good");
        assert!(matches!(
            report.outcomes.iter().find(|o| o.path == missing).unwrap().result,
            Err(ParseError::Io { .. })
        ));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_batch_is_not_a_failure() {
        let report = Parser::new().parse_files(&[], |_| {});
        assert!(!report.all_failed());
        assert_eq!(report.succeeded(), 0);
    }
}
