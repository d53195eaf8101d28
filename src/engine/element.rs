//! Pattern elements.
//!
//! Every element shares one contract: `match_at(cursor, ..)` either consumes
//! one or more tokens starting at `cursor` and returns the advanced cursor, or
//! returns `None`. Because cursors are values, a failed attempt leaves the
//! caller exactly where it started.
//!
//! ```text
//! Word({i, we})          "We"            -> consumes 1
//! PartOfSpeech(VERB)     "likes"/VERB    -> consumes 1
//! Phrase(Strict)         "nature of life" contiguous from cursor
//! Phrase(Any)            each word somewhere in the remaining stream
//! Wildcard               up to where the next element first succeeds
//! Disjunction([p1, p2])  first alternative that matches as a whole
//! ```

use super::cursor::Cursor;
use super::matcher::match_sequence;
use super::pattern::Pattern;
use crate::{PartOfSpeech, Token};
use std::collections::BTreeSet;

/// How a phrase element treats the order of its words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhraseOrder {
    /// Words must appear contiguously and in the declared order, starting at
    /// the cursor.
    #[default]
    Strict,
    /// Each word must be matched by a distinct token somewhere in the
    /// remaining stream; relative order and gaps do not matter.
    Any,
}

/// One unit of match logic inside a [`Pattern`].
///
/// Elements are built through [`PatternBuilder`](super::PatternBuilder),
/// which rejects empty word sets, empty phrases and empty disjunctions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElement {
    /// Any one of the accepted surface forms (stored lowercased).
    Word(BTreeSet<String>),
    /// A multi-word phrase (words stored lowercased).
    Phrase { words: Vec<String>, order: PhraseOrder },
    /// A single token carrying the given tag.
    PartOfSpeech(PartOfSpeech),
    /// A non-empty span of arbitrary tokens, captured as an extracted variable.
    Wildcard,
    /// Ordered alternatives; the first one matching as a whole wins.
    Disjunction(Vec<Pattern>),
}

impl PatternElement {
    /// Attempt this element at `cursor`.
    ///
    /// `next` is the element that follows in the same sequence; only
    /// [`PatternElement::Wildcard`] looks at it, to know where its span ends.
    /// Extracted variables are appended to `extracted` on success only.
    pub(crate) fn match_at<'a>(
        &self,
        cursor: Cursor<'a>,
        next: Option<&PatternElement>,
        extracted: &mut Vec<String>,
    ) -> Option<Cursor<'a>> {
        match self {
            PatternElement::Word(forms) => {
                let token = cursor.current()?;
                forms.contains(&token.text.to_lowercase()).then(|| cursor.advance())
            }
            PatternElement::PartOfSpeech(tag) => {
                let token = cursor.current()?;
                (token.pos == *tag).then(|| cursor.advance())
            }
            PatternElement::Phrase { words, order: PhraseOrder::Strict } => match_strict_phrase(words, cursor),
            PatternElement::Phrase { words, order: PhraseOrder::Any } => match_unordered_phrase(words, cursor),
            PatternElement::Wildcard => {
                if !cursor.has_remaining() {
                    return None;
                }
                let end = match next {
                    None => cursor.at(cursor.len()),
                    Some(next) => {
                        let mut lookahead = Vec::new();
                        (cursor.position() + 1..cursor.len())
                            .map(|i| cursor.at(i))
                            .find(|&candidate| next.match_at(candidate, None, &mut lookahead).is_some())
                            .unwrap_or_else(|| cursor.at(cursor.len()))
                    }
                };
                extracted.push(join_text(cursor.span_to(&end)));
                Some(end)
            }
            PatternElement::Disjunction(alternatives) => alternatives.iter().find_map(|alternative| {
                let mut scoped = Vec::new();
                let end = match_sequence(alternative.elements(), cursor, &mut scoped)?;
                extracted.append(&mut scoped);
                Some(end)
            }),
        }
    }

    /// Short human-readable label, used in traces and reports.
    pub fn describe(&self) -> String {
        match self {
            PatternElement::Word(forms) => format!("word({})", forms.iter().cloned().collect::<Vec<_>>().join("|")),
            PatternElement::Phrase { words, order } => format!("phrase({:?}: {})", order, words.join(" ")),
            PatternElement::PartOfSpeech(tag) => format!("pos({tag})"),
            PatternElement::Wildcard => "*".to_string(),
            PatternElement::Disjunction(alternatives) => format!("any-of({})", alternatives.len()),
        }
    }
}

fn match_strict_phrase<'a>(words: &[String], cursor: Cursor<'a>) -> Option<Cursor<'a>> {
    let remaining = cursor.remaining();
    if remaining.len() < words.len() {
        return None;
    }
    let all_match = words.iter().zip(remaining).all(|(word, token)| token.text.to_lowercase() == *word);
    all_match.then(|| cursor.advance_by(words.len()))
}

fn match_unordered_phrase<'a>(words: &[String], cursor: Cursor<'a>) -> Option<Cursor<'a>> {
    let remaining = cursor.remaining();
    let lowered: Vec<String> = remaining.iter().map(|t| t.text.to_lowercase()).collect();
    let mut used = vec![false; remaining.len()];
    let mut furthest = 0;

    for word in words {
        let idx = (0..lowered.len()).find(|&i| !used[i] && lowered[i] == *word)?;
        used[idx] = true;
        furthest = furthest.max(idx + 1);
    }

    Some(cursor.advance_by(furthest))
}

fn join_text(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PatternBuilder;

    fn word(forms: &[&str]) -> PatternElement {
        PatternElement::Word(forms.iter().map(|f| f.to_lowercase()).collect())
    }

    #[test]
    fn word_matches_case_insensitively_and_consumes_one_token() {
        let tokens = tokens!["WE"/Pron, "are"/Aux];
        let mut extracted = Vec::new();

        let end = word(&["i", "we"]).match_at(Cursor::new(&tokens), None, &mut extracted).unwrap();

        assert_eq!(end.position(), 1);
        assert!(extracted.is_empty());
    }

    #[test]
    fn word_rejects_other_forms() {
        let tokens = tokens!["they"/Pron];
        let mut extracted = Vec::new();
        assert!(word(&["i", "we"]).match_at(Cursor::new(&tokens), None, &mut extracted).is_none());
    }

    #[test]
    fn part_of_speech_checks_tag_only() {
        let tokens = tokens!["apples"/Noun, "eat"/Verb];
        let mut extracted = Vec::new();
        let noun = PatternElement::PartOfSpeech(PartOfSpeech::Noun);

        assert_eq!(noun.match_at(Cursor::new(&tokens), None, &mut extracted).map(|c| c.position()), Some(1));
        assert!(noun.match_at(Cursor::new(&tokens).advance(), None, &mut extracted).is_none());
        assert!(extracted.is_empty());
    }

    #[test]
    fn strict_phrase_needs_contiguous_order() {
        let phrase = PatternElement::Phrase { words: vec!["nature".into(), "of".into()], order: PhraseOrder::Strict };
        let mut extracted = Vec::new();

        let good = tokens!["Nature"/Noun, "of"/Adp, "life"/Noun];
        assert_eq!(phrase.match_at(Cursor::new(&good), None, &mut extracted).map(|c| c.position()), Some(2));

        let swapped = tokens!["of"/Adp, "nature"/Noun];
        assert!(phrase.match_at(Cursor::new(&swapped), None, &mut extracted).is_none());
    }

    #[test]
    fn unordered_phrase_uses_distinct_tokens() {
        let phrase = PatternElement::Phrase { words: vec!["of".into(), "of".into()], order: PhraseOrder::Any };
        let mut extracted = Vec::new();

        let once = tokens!["of"/Adp, "life"/Noun];
        assert!(phrase.match_at(Cursor::new(&once), None, &mut extracted).is_none());

        let twice = tokens!["of"/Adp, "life"/Noun, "of"/Adp, "nature"/Noun];
        assert_eq!(phrase.match_at(Cursor::new(&twice), None, &mut extracted).map(|c| c.position()), Some(3));
    }

    #[test]
    fn wildcard_stops_before_next_element() {
        let tokens = tokens!["fly"/Verb, "to"/Adp, "New"/Propn, "York"/Propn, "tomorrow"/Noun];
        let next = word(&["tomorrow"]);
        let mut extracted = Vec::new();

        let end = PatternElement::Wildcard.match_at(Cursor::new(&tokens).at(2), Some(&next), &mut extracted).unwrap();

        assert_eq!(end.position(), 4);
        assert_eq!(extracted, vec!["New York".to_string()]);
    }

    #[test]
    fn wildcard_needs_at_least_one_token() {
        let tokens = tokens!["hi"/Intj];
        let mut extracted = Vec::new();
        let exhausted = Cursor::new(&tokens).advance();
        assert!(PatternElement::Wildcard.match_at(exhausted, None, &mut extracted).is_none());
        assert!(extracted.is_empty());
    }

    #[test]
    fn disjunction_keeps_only_winning_alternative_variables() {
        let pattern = PatternBuilder::new()
            .disjunction(|d| {
                d.alternative(|p| p.wildcard().word(["please"])).alternative(|p| p.word(["go"]).wildcard())
            })
            .build()
            .unwrap();
        let tokens = tokens!["go"/Verb, "home"/Noun];
        let mut extracted = Vec::new();

        let end = pattern.elements()[0].match_at(Cursor::new(&tokens), None, &mut extracted).unwrap();

        assert_eq!(end.position(), 2);
        assert_eq!(extracted, vec!["home".to_string()]);
    }
}
