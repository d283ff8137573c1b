//! Extractive summarization: sentence segmentation, part-of-speech weighted
//! BM25 scoring over the post's own sentences, and order-preserving top-k
//! selection with a hard length cap.
//!
//! Earlier revisions of this pipeline fell back to naive truncation; that
//! design is superseded and failures here are surfaced, never papered over.

pub mod tokenizer;

use std::sync::Arc;

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::config::SummaryConfig;
use crate::error::ParseError;
use tokenizer::Tokenize;

static BODY_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

const TERMINATORS: &[char] = &['。', '！', '？', '.', '!', '?'];
const OPENERS: &[char] = &['（', '(', '「', '『', '【', '['];
const CLOSERS: &[char] = &['）', ')', '」', '』', '】', ']'];

/// A retained token with its importance weight.
#[derive(Debug, Clone)]
pub struct Word {
    pub surface: String,
    pub lemma: String,
    pub part_of_speech: String,
    pub weight: f64,
}

pub struct Summarizer {
    config: SummaryConfig,
    tokenizer: Arc<dyn Tokenize>,
}

impl Summarizer {
    pub fn new(config: SummaryConfig, tokenizer: Arc<dyn Tokenize>) -> Self {
        Self { config, tokenizer }
    }

    /// Produces the extractive summary of a cleaned content fragment.
    pub fn summarize(&self, content_html: &str) -> Result<String, ParseError> {
        if content_html.is_empty() {
            return Err(ParseError::EmptyContent);
        }

        let text = normalize_text(&plain_text(content_html));
        let sentences = split_sentences(&text);

        // Nothing to rank below three sentences.
        if sentences.len() <= 2 {
            return Ok(text);
        }

        let vectors = self.vectorize(&sentences)?;

        let lengths: Vec<f64> = sentences.iter().map(|s| s.chars().count() as f64).collect();
        let avg_len = lengths.iter().sum::<f64>() / sentences.len() as f64;

        let scores: Vec<f64> = vectors
            .iter()
            .enumerate()
            .map(|(i, words)| bm25_score(words, &vectors, lengths[i], avg_len, &self.config))
            .collect();

        // Rank descending; stable sort keeps ties in document order.
        let mut ranked: Vec<usize> = (0..sentences.len()).collect();
        ranked.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Top sentences go back into document order before concatenation.
        let mut selected: Vec<usize> = ranked.into_iter().take(self.config.top_sentences).collect();
        selected.sort_unstable();

        let summary: String = selected
            .into_iter()
            .map(|i| sentences[i].as_str())
            .collect();
        Ok(self.truncate(&summary))
    }

    fn vectorize(&self, sentences: &[String]) -> Result<Vec<Vec<Word>>, ParseError> {
        sentences
            .iter()
            .map(|sentence| {
                let tokens = self
                    .tokenizer
                    .tokenize(sentence)
                    .map_err(ParseError::Summarization)?;
                Ok(tokens
                    .into_iter()
                    .filter_map(|t| {
                        let weight = word_weight(&t.part_of_speech, &self.config);
                        (weight > 0.0).then(|| Word {
                            surface: t.surface,
                            lemma: t.lemma,
                            part_of_speech: t.part_of_speech,
                            weight,
                        })
                    })
                    .collect())
            })
            .collect()
    }

    /// Caps the summary at `max_chars` code points; when clipping, the tail
    /// is replaced by the ellipsis marker so the total stays exactly at the
    /// cap.
    fn truncate(&self, summary: &str) -> String {
        let total = summary.chars().count();
        if total <= self.config.max_chars {
            return summary.to_string();
        }
        let ellipsis_len = self.config.ellipsis.chars().count();
        let keep = self.config.max_chars.saturating_sub(ellipsis_len);
        let mut out: String = summary.chars().take(keep).collect();
        out.push_str(&self.config.ellipsis);
        out
    }
}

/// Exact part-of-speech weight, then coarse-category prefix fallback;
/// unlisted categories weigh zero and are dropped.
pub fn word_weight(pos: &str, config: &SummaryConfig) -> f64 {
    if let Some((_, w)) = config.pos_weights.iter().find(|(p, _)| p == pos) {
        return *w;
    }
    config
        .pos_prefix_weights
        .iter()
        .find(|(prefix, _)| pos.starts_with(prefix.as_str()))
        .map(|(_, w)| *w)
        .unwrap_or(0.0)
}

/// BM25 score of one sentence against the post's sentence collection, with
/// the part-of-speech weight multiplying each token's contribution.
fn bm25_score(
    words: &[Word],
    all: &[Vec<Word>],
    sentence_len: f64,
    avg_len: f64,
    config: &SummaryConfig,
) -> f64 {
    let n = all.len() as f64;
    let mut score = 0.0;
    for word in words {
        let df = all
            .iter()
            .filter(|doc| doc.iter().any(|w| w.lemma == word.lemma))
            .count() as f64;
        // A term in a majority of sentences contributes nothing.
        let idf = ((n - df + 0.5) / (df + 0.5)).ln().max(0.0);
        let tf = words.iter().filter(|w| w.lemma == word.lemma).count() as f64;
        let numerator = tf * (config.k1 + 1.0);
        let denominator =
            tf + config.k1 * (1.0 - config.b + config.b * sentence_len / avg_len);
        score += idf * numerator / denominator * word.weight;
    }
    score
}

/// Body text of the fragment; whole-tree text when the parse has no body.
fn plain_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    match doc.select(&BODY_SEL).next() {
        Some(body) => body.text().collect(),
        None => doc
            .root_element()
            .text()
            .collect(),
    }
}

fn normalize_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits on sentence-ending punctuation, except inside bracketed spans:
/// parenthetical asides never terminate a sentence. Terminators are dropped
/// and blank sentences discarded.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut depth: usize = 0;

    for c in text.chars() {
        if OPENERS.contains(&c) {
            depth += 1;
            current.push(c);
        } else if CLOSERS.contains(&c) {
            depth = depth.saturating_sub(1);
            current.push(c);
        } else if depth == 0 && TERMINATORS.contains(&c) {
            push_sentence(&mut sentences, &mut current);
        } else {
            current.push(c);
        }
    }
    push_sentence(&mut sentences, &mut current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}
