//! Utterances and cursors.
//!
//! An [`Utterance`] owns one turn's raw text and its tagged tokens. A
//! [`Cursor`] is a `Copy` view into those tokens plus a position: match
//! attempts take a cursor by value and hand back an advanced one on success,
//! so a failed attempt can never disturb the caller's position.
//!
//! ```text
//! tokens:   [Today] [We] [are] [in] [Sumy]
//! position:    0      1    2     3     4     5 (= len, exhausted)
//! ```

use crate::Token;

/// One turn of user input: raw text plus its tagged token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    raw: String,
    tokens: Vec<Token>,
}

impl Utterance {
    pub fn new(raw: impl Into<String>, tokens: Vec<Token>) -> Self {
        Utterance { raw: raw.into(), tokens }
    }

    /// The input text exactly as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// A cursor positioned at the first token.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.tokens)
    }
}

/// Forward-only position into a token slice.
///
/// Invariant: `position <= tokens.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_remaining(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// The token under the cursor, if any.
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// Tokens from the cursor to the end of the stream.
    pub fn remaining(&self) -> &'a [Token] {
        &self.tokens[self.position..]
    }

    /// Cursor back at position 0.
    pub fn reset(self) -> Self {
        Cursor { position: 0, ..self }
    }

    /// Cursor one token further; saturates at the end of the stream.
    pub fn advance(self) -> Self {
        self.advance_by(1)
    }

    pub(crate) fn advance_by(self, n: usize) -> Self {
        Cursor { position: (self.position + n).min(self.tokens.len()), ..self }
    }

    pub(crate) fn at(self, position: usize) -> Self {
        Cursor { position: position.min(self.tokens.len()), ..self }
    }

    /// Tokens between `self` and a later cursor over the same stream.
    pub(crate) fn span_to(&self, end: &Cursor<'a>) -> &'a [Token] {
        &self.tokens[self.position..end.position.max(self.position)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_steps_forward_and_resets() {
        let tokens = tokens!["I"/Pron, "am"/Aux];
        let cursor = Cursor::new(&tokens);
        assert_eq!(cursor.position(), 0);
        assert!(cursor.has_remaining());

        let cursor = cursor.advance();
        assert_eq!(cursor.current().map(|t| t.text.as_str()), Some("am"));

        let cursor = cursor.advance().advance();
        assert_eq!(cursor.position(), 2);
        assert!(!cursor.has_remaining());
        assert!(cursor.current().is_none());

        assert_eq!(cursor.reset().position(), 0);
    }

    #[test]
    fn empty_utterance_has_nothing_remaining() {
        let utterance = Utterance::new("", Vec::new());
        assert!(utterance.cursor().is_empty());
        assert!(!utterance.cursor().has_remaining());
    }
}
