//! The pattern engine.
//!
//! ```text
//! pattern:  [Word(i|we)] [Word(am|are)] [Word(at|in)] [*]
//! tokens:    Today  We  are  in  Sumy
//!              ✗    ✓    ✓    ✓   ✓ -> extracted = ["Sumy"]
//!              └ skipped by the retry loop
//! ```
//!
//! For each element the engine tries the current position; on failure it
//! steps forward one token and retries the *same* element. Once an element
//! succeeds it is never revisited, so the scan is O(tokens × elements).

use super::cursor::Cursor;
use super::element::PatternElement;
use super::pattern::Pattern;
use std::ops::Index;

/// Verdict of matching one pattern against one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether every element of the pattern matched.
    pub matched: bool,
    /// Wildcard captures, in element declaration order.
    pub extracted: Vec<String>,
}

impl MatchResult {
    pub fn success(extracted: Vec<String>) -> Self {
        MatchResult { matched: true, extracted }
    }

    pub fn failure() -> Self {
        MatchResult { matched: false, extracted: Vec::new() }
    }

    /// The `idx`-th extracted variable, if present.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.extracted.get(idx).map(String::as_str)
    }
}

impl Index<usize> for MatchResult {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        &self.extracted[idx]
    }
}

/// Match `pattern` against the tokens behind `cursor`.
///
/// The cursor is reset first, so the result only depends on the token
/// stream and the pattern.
pub fn match_pattern(pattern: &Pattern, cursor: Cursor<'_>) -> MatchResult {
    let mut extracted = Vec::new();
    match match_sequence(pattern.elements(), cursor.reset(), &mut extracted) {
        Some(_) => MatchResult::success(extracted),
        None => MatchResult::failure(),
    }
}

/// Element-retry loop shared by top-level patterns and disjunction
/// alternatives. Returns the cursor after the last element on success.
pub(crate) fn match_sequence<'a>(
    elements: &[PatternElement],
    mut cursor: Cursor<'a>,
    extracted: &mut Vec<String>,
) -> Option<Cursor<'a>> {
    for (idx, element) in elements.iter().enumerate() {
        let next = elements.get(idx + 1);
        cursor = loop {
            if !cursor.has_remaining() {
                tracing::trace!(element = %element.describe(), "stream exhausted before element matched");
                return None;
            }
            if let Some(advanced) = element.match_at(cursor, next, extracted) {
                break advanced;
            }
            cursor = cursor.advance();
        };
    }
    Some(cursor)
}
