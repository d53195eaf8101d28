//! Tokenization.
//!
//! The engine only depends on the [`Tokenizer`] trait; any tagger able to
//! produce `Token { text, pos, lemma }` can drive it. [`LexiconTokenizer`] is
//! the built-in reference implementation: good enough for demo bots and
//! tests, not a statistical tagger.
//!
//! ```text
//! "She likes apples."
//!   └─ split ──> She | likes | apples | .
//!   └─ tag   ──> PRON  VERB    NOUN    PUNCT
//!   └─ lemma ──> she   like    apple   .
//! ```
//!
//! Tagging order for each word: punctuation/number shape, closed-class
//! lexicon, verb lexicon (with inflection stripping), adjective lexicon and
//! suffixes, capitalization (proper noun), then noun as the fallback.

#[path = "tokenize/lexicon.rs"]
mod lexicon;

use crate::error::TokenizeError;
use crate::Token;
use std::fmt;

/// Turns raw text into tagged tokens. Implementations must be deterministic.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    German,
}

impl Language {
    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
        }
    }

    /// Parse an ISO 639-1 code or English language name.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "de" | "german" => Some(Language::German),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Lexicon and suffix based tagger. Only English has a lexicon; other
/// languages fail with [`TokenizeError::UnsupportedLanguage`].
#[derive(Debug, Clone)]
pub struct LexiconTokenizer {
    language: Language,
}

impl LexiconTokenizer {
    pub fn new(language: Language) -> Self {
        LexiconTokenizer { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Default for LexiconTokenizer {
    fn default() -> Self {
        Self::new(Language::English)
    }
}

impl Tokenizer for LexiconTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        if self.language != Language::English {
            return Err(TokenizeError::UnsupportedLanguage(self.language));
        }

        let words = regex!(r"[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]");
        Ok(words
            .find_iter(text)
            .enumerate()
            .map(|(idx, m)| {
                let (pos, lemma) = lexicon::tag(m.as_str(), idx == 0);
                Token { text: m.as_str().to_string(), pos, lemma }
            })
            .collect())
    }
}
