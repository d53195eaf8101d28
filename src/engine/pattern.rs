//! Patterns and their builders.
//!
//! A [`Pattern`] is an ordered, non-empty sequence of [`PatternElement`]s. It
//! can only be produced by [`PatternBuilder::build`], which validates every
//! element, so a pattern that exists is one the engine can evaluate.
//!
//! Builder methods take and return `self` so patterns read left to right:
//!
//! ```ignore
//! let pattern = PatternBuilder::new()
//!     .word(["i", "we"]).word(["am", "are"]).word(["at", "in"]).wildcard()
//!     .build()?;
//! ```
//!
//! Invalid input does not panic mid-chain: the first problem is remembered
//! and reported by `build()`.

use super::element::{PatternElement, PhraseOrder};
use crate::{BuildError, PartOfSpeech};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    elements: Vec<PatternElement>,
}

impl Pattern {
    /// Start a new pattern.
    pub fn builder() -> PatternBuilder {
        PatternBuilder::new()
    }

    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Compact description, e.g. `word(am|are) pos(NOUN) *`.
    pub fn describe(&self) -> String {
        self.elements.iter().map(PatternElement::describe).collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Default)]
pub struct PatternBuilder {
    elements: Vec<PatternElement>,
    error: Option<BuildError>,
}

impl PatternBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match one token whose text is any of `forms` (case-insensitive).
    pub fn word<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let forms: BTreeSet<String> =
            forms.into_iter().map(|f| f.as_ref().trim().to_lowercase()).filter(|f| !f.is_empty()).collect();
        if let Some(form) = forms.iter().find(|f| f.contains(char::is_whitespace)) {
            self.fail(BuildError::MultiWordForm { form: form.clone() });
        } else if forms.is_empty() {
            self.fail(BuildError::EmptyWordSet);
        } else {
            self.elements.push(PatternElement::Word(forms));
        }
        self
    }

    /// Match a whitespace-separated phrase, honoring `order`.
    pub fn phrase(mut self, text: &str, order: PhraseOrder) -> Self {
        let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            self.fail(BuildError::EmptyPhrase);
        } else {
            self.elements.push(PatternElement::Phrase { words, order });
        }
        self
    }

    /// Match one token tagged `tag`.
    pub fn pos(mut self, tag: PartOfSpeech) -> Self {
        self.elements.push(PatternElement::PartOfSpeech(tag));
        self
    }

    pub fn noun(self) -> Self {
        self.pos(PartOfSpeech::Noun)
    }

    pub fn verb(self) -> Self {
        self.pos(PartOfSpeech::Verb)
    }

    pub fn pronoun(self) -> Self {
        self.pos(PartOfSpeech::Pron)
    }

    pub fn adjective(self) -> Self {
        self.pos(PartOfSpeech::Adj)
    }

    /// Capture a non-empty span of tokens as an extracted variable.
    pub fn wildcard(mut self) -> Self {
        self.elements.push(PatternElement::Wildcard);
        self
    }

    /// Match the first of several alternative sub-patterns.
    pub fn disjunction(mut self, f: impl FnOnce(DisjunctionBuilder) -> DisjunctionBuilder) -> Self {
        match f(DisjunctionBuilder::new()).build() {
            Ok(element) => self.elements.push(element),
            Err(err) => self.fail(err),
        }
        self
    }

    pub fn build(self) -> Result<Pattern, BuildError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.elements.is_empty() {
            return Err(BuildError::EmptyPattern);
        }
        Ok(Pattern { elements: self.elements })
    }

    fn fail(&mut self, err: BuildError) {
        self.error.get_or_insert(err);
    }
}

/// Collects the alternatives of a [`PatternElement::Disjunction`].
///
/// Alternatives are tried in the order they are added here.
#[derive(Debug, Default)]
pub struct DisjunctionBuilder {
    alternatives: Vec<Pattern>,
    error: Option<BuildError>,
}

impl DisjunctionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alternative(mut self, f: impl FnOnce(PatternBuilder) -> PatternBuilder) -> Self {
        match f(PatternBuilder::new()).build() {
            Ok(pattern) => self.alternatives.push(pattern),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    pub fn build(self) -> Result<PatternElement, BuildError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.alternatives.is_empty() {
            return Err(BuildError::EmptyDisjunction);
        }
        Ok(PatternElement::Disjunction(self.alternatives))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_elements_in_declaration_order() {
        let pattern = Pattern::builder().word(["Hi", "hello"]).noun().wildcard().build().unwrap();

        assert_eq!(pattern.len(), 3);
        assert_eq!(pattern.elements()[0], PatternElement::Word(["hi".to_string(), "hello".to_string()].into()));
        assert_eq!(pattern.elements()[1], PatternElement::PartOfSpeech(PartOfSpeech::Noun));
        assert_eq!(pattern.elements()[2], PatternElement::Wildcard);
        assert_eq!(pattern.describe(), "word(hello|hi) pos(NOUN) *");
    }

    #[test]
    fn rejects_empty_word_set() {
        let err = PatternBuilder::new().word(["", "  "]).wildcard().build().unwrap_err();
        assert!(matches!(err, BuildError::EmptyWordSet));
    }

    #[test]
    fn rejects_word_forms_spanning_several_tokens() {
        let err = PatternBuilder::new().word(["Lisbon", " New  York "]).build().unwrap_err();
        assert!(matches!(err, BuildError::MultiWordForm { ref form } if form == "new  york"));

        assert!(PatternBuilder::new().phrase("new york", PhraseOrder::Strict).build().is_ok());
    }

    #[test]
    fn rejects_empty_phrase() {
        let err = PatternBuilder::new().phrase("   ", PhraseOrder::Any).build().unwrap_err();
        assert!(matches!(err, BuildError::EmptyPhrase));
    }

    #[test]
    fn rejects_empty_pattern() {
        assert!(matches!(PatternBuilder::new().build(), Err(BuildError::EmptyPattern)));
    }

    #[test]
    fn rejects_empty_disjunction_and_empty_alternatives() {
        let err = PatternBuilder::new().disjunction(|d| d).build().unwrap_err();
        assert!(matches!(err, BuildError::EmptyDisjunction));

        let err = PatternBuilder::new().disjunction(|d| d.alternative(|p| p)).build().unwrap_err();
        assert!(matches!(err, BuildError::EmptyPattern));
    }

    #[test]
    fn first_error_wins() {
        let err = PatternBuilder::new().word(Vec::<&str>::new()).phrase("", PhraseOrder::Strict).build().unwrap_err();
        assert!(matches!(err, BuildError::EmptyWordSet));
    }
}
