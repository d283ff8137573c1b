//! Morphological tokenizer seam.
//!
//! The engine only depends on the [`Tokenize`] trait. The default backend is
//! a dictionary-free character-class segmenter that approximates Japanese
//! morphology well enough for term weighting; the `lindera` feature swaps in
//! a real IPA-dictionary analyzer with the same contract.

/// One tagged token. `lemma` is the canonical form used for term matching;
/// `part_of_speech` uses IPA-style categories (e.g. `名詞-一般`).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub surface: String,
    pub lemma: String,
    pub part_of_speech: String,
}

pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, String>;
}

/// Segments text into runs of one character class and tags each run with a
/// coarse IPA-style part of speech. Hiragana runs are mostly particles and
/// inflections, so they are tagged as particles and end up weightless;
/// kanji, katakana and latin runs carry the content terms.
#[derive(Debug, Default, Clone)]
pub struct CharClassTokenizer;

impl CharClassTokenizer {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Kanji,
    Hiragana,
    Katakana,
    Latin,
    Digit,
    Other,
}

fn classify(c: char) -> CharClass {
    match c {
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '々' | '〆' => CharClass::Kanji,
        '\u{3040}'..='\u{309F}' => CharClass::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' => CharClass::Katakana,
        c if c.is_ascii_alphabetic() => CharClass::Latin,
        c if c.is_ascii_digit() => CharClass::Digit,
        '\u{FF10}'..='\u{FF19}' => CharClass::Digit,
        '\u{FF21}'..='\u{FF3A}' | '\u{FF41}'..='\u{FF5A}' => CharClass::Latin,
        _ => CharClass::Other,
    }
}

fn part_of_speech(class: CharClass) -> &'static str {
    match class {
        CharClass::Kanji | CharClass::Katakana | CharClass::Latin => "名詞-一般",
        CharClass::Digit => "名詞-数",
        CharClass::Hiragana => "助詞-一般",
        CharClass::Other => "記号-一般",
    }
}

impl Tokenize for CharClassTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();
        let mut run = String::new();
        let mut run_class = CharClass::Other;

        let flush = |run: &mut String, class: CharClass, tokens: &mut Vec<Token>| {
            if !run.is_empty() {
                tokens.push(Token {
                    surface: run.clone(),
                    lemma: run.clone(),
                    part_of_speech: part_of_speech(class).to_string(),
                });
                run.clear();
            }
        };

        for c in text.chars() {
            if c.is_whitespace() {
                flush(&mut run, run_class, &mut tokens);
                continue;
            }
            let class = classify(c);
            if class != run_class {
                flush(&mut run, run_class, &mut tokens);
                run_class = class;
            }
            run.push(c);
        }
        flush(&mut run, run_class, &mut tokens);
        Ok(tokens)
    }
}

/// IPA-dictionary morphological analyzer, mirroring the part-of-speech and
/// base-form layout the weight table was tuned against. The dictionary is
/// fetched at build time, hence the feature gate.
#[cfg(feature = "lindera")]
pub struct LinderaTokenizer {
    inner: lindera::tokenizer::Tokenizer,
}

#[cfg(feature = "lindera")]
impl LinderaTokenizer {
    pub fn new() -> Result<Self, String> {
        use lindera::dictionary::{load_dictionary_from_kind, DictionaryKind};
        use lindera::mode::Mode;
        use lindera::segmenter::Segmenter;

        let dictionary =
            load_dictionary_from_kind(DictionaryKind::IPADIC).map_err(|e| e.to_string())?;
        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        Ok(Self {
            inner: lindera::tokenizer::Tokenizer::new(segmenter),
        })
    }
}

#[cfg(feature = "lindera")]
impl Tokenize for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, String> {
        let mut lindera_tokens = self.inner.tokenize(text).map_err(|e| e.to_string())?;
        let mut tokens = Vec::with_capacity(lindera_tokens.len());
        for token in lindera_tokens.iter_mut() {
            let details = token.details();
            if details.len() < 7 {
                continue;
            }
            let mut pos = details[0].to_string();
            if details.len() > 1 {
                pos.push('-');
                pos.push_str(details[1]);
            }
            tokens.push(Token {
                surface: token.text.to_string(),
                lemma: details[6].to_string(),
                part_of_speech: pos,
            });
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_character_class_boundaries() {
        let tokens = CharClassTokenizer::new().tokenize("東京タワーに登った").unwrap();
        let surfaces: Vec<&str> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["東京", "タワー", "に", "登", "った"]);
    }

    #[test]
    fn tags_content_runs_as_nouns() {
        let tokens = CharClassTokenizer::new().tokenize("Rust 2024 です").unwrap();
        assert_eq!(tokens[0].part_of_speech, "名詞-一般");
        assert_eq!(tokens[1].part_of_speech, "名詞-数");
        assert_eq!(tokens[2].part_of_speech, "助詞-一般");
    }

    #[test]
    fn lemma_matches_surface_for_the_builtin() {
        let tokens = CharClassTokenizer::new().tokenize("単語").unwrap();
        assert_eq!(tokens[0].lemma, tokens[0].surface);
    }

    #[test]
    fn whitespace_never_appears_in_tokens() {
        let tokens = CharClassTokenizer::new().tokenize("  a  b  ").unwrap();
        assert_eq!(tokens.len(), 2);
    }
}
