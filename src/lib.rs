//! Blog post parser: extracts structured posts (title, cleaned content,
//! extractive summary, categories, tags, date, lead image) from exported
//! blog HTML files.

pub mod config;
pub mod dom;
pub mod error;
pub mod model;
pub mod parser;
pub mod summary;

pub use config::{ParserConfig, SummaryConfig};
pub use error::ParseError;
pub use model::{BlogPost, ImageInfo};
pub use parser::{BatchOutcome, BatchReport, CancelToken, Parser};
pub use summary::Summarizer;
