extern crate self as fluency;

#[macro_use]
mod macros;
mod api;
mod conversation;
mod engine;
mod error;
mod rules;
mod store;
mod tokenize;

pub use api::{Bot, ChatEngine, Options, Reply, RuleTestOutcome, TurnDetails, verify_rules};
pub use conversation::{CandidateSet, Conversation, Message, RulePath, Speaker};
pub use engine::{
    CandidateSource, Cursor, DisjunctionBuilder, MatchResult, Pattern, PatternBuilder, PatternElement, PhraseOrder,
    TurnMetrics, Utterance, match_pattern,
};
pub use error::{BuildError, StoreError, TokenizeError, TurnError};
pub use rules::{Rule, RuleBuilder, RuleFlags, RuleTest, Topic};
pub use store::{ConversationStore, InMemoryConversationStore};
pub use tokenize::{Language, LexiconTokenizer, Tokenizer};

// --- Token model --------------------------------------------------------------

/// Universal part-of-speech tags, as emitted by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    /// Adjective.
    Adj,
    /// Adposition (prepositions and postpositions).
    Adp,
    /// Adverb.
    Adv,
    /// Auxiliary verb.
    Aux,
    /// Coordinating conjunction.
    Cconj,
    /// Determiner.
    Det,
    /// Interjection.
    Intj,
    /// Noun.
    Noun,
    /// Numeral.
    Num,
    /// Particle.
    Part,
    /// Pronoun.
    Pron,
    /// Proper noun.
    Propn,
    /// Punctuation.
    Punct,
    /// Subordinating conjunction.
    Sconj,
    /// Symbol.
    Sym,
    /// Verb.
    Verb,
    /// Anything the tagger could not classify.
    X,
}

impl PartOfSpeech {
    /// The conventional upper-case tag name (`"NOUN"`, `"PRON"`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Intj => "INTJ",
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Part => "PART",
            PartOfSpeech::Pron => "PRON",
            PartOfSpeech::Propn => "PROPN",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Sconj => "SCONJ",
            PartOfSpeech::Sym => "SYM",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::X => "X",
        }
    }
}

impl std::fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single tagged word unit.
///
/// Tokens are produced by a [`Tokenizer`] and never modified afterwards; the
/// pattern engine only reads `text` and `pos`, rules may look at `lemma`
/// through their conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface text exactly as it appeared in the input.
    pub text: String,
    /// Part-of-speech tag.
    pub pos: PartOfSpeech,
    /// Dictionary form, lowercased.
    pub lemma: String,
}

impl Token {
    pub fn new(text: impl Into<String>, pos: PartOfSpeech, lemma: impl Into<String>) -> Self {
        Token { text: text.into(), pos, lemma: lemma.into() }
    }
}
