use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while parsing a single document.
///
/// Title, content, cleaning and summarization failures are fatal for the
/// document; categories, tags, date and lead image degrade to empty/None and
/// never surface here.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse HTML document: {0}")]
    DocumentParse(String),

    #[error("title not found")]
    TitleNotFound,

    #[error("invalid title: {0:?}")]
    InvalidTitle(String),

    #[error("content not found; attempts:\n- {}", .attempts.join("\n- "))]
    ContentNotFound { attempts: Vec<String> },

    #[error("content too short after normalization: {len} chars (minimum 100)")]
    InvalidContent { len: usize },

    #[error("content is empty")]
    EmptyContent,

    #[error("tokenizer unavailable: {0}")]
    TokenizerUnavailable(String),

    #[error("summarization failed: {0}")]
    Summarization(String),

    /// The category extractor itself could not run (e.g. a bad injected
    /// selector). An empty category set is valid and is not this error.
    #[error("category extraction failed: {0}")]
    CategoryExtraction(String),

    /// Same contract as `CategoryExtraction`, for tags.
    #[error("tag extraction failed: {0}")]
    TagExtraction(String),

    #[error("cancelled")]
    Cancelled,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
