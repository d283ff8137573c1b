use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One normalized blog post, assembled from a single HTML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    /// Cleaned body HTML.
    pub content: String,
    /// Extractive summary of the body, at most 300 code points.
    pub summary: String,
    /// Deduplicated, in first-seen order.
    pub categories: Vec<String>,
    /// Deduplicated, in first-seen order.
    pub tags: Vec<String>,
    /// None means "not found", which is valid for legacy exports.
    pub created_at: Option<NaiveDateTime>,
    /// Lead image URL; empty when the document carries none.
    pub first_image: String,
    /// Caller-assigned; `parse_file` sets the source file stem.
    pub slug: String,
}

/// A single image found in a document, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    pub url: String,
    pub alt: String,
    pub width: String,
    pub height: String,
    /// og/twitter description for meta-tag images, figcaption for inline ones.
    pub description: String,
}
