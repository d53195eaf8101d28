//! Error types.
//!
//! Authoring mistakes surface as [`BuildError`] when a rule is added to its
//! topic. A turn fails only with [`TurnError`]; "no rule matched" is not an
//! error but a silent [`Reply`](crate::Reply).

use crate::tokenize::Language;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid regular expression '{pattern}'")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{rule}' has no output renderer")]
    MissingOutput { rule: String },

    #[error("word element needs at least one accepted form")]
    EmptyWordSet,

    #[error("word form '{form}' spans several tokens; use a phrase element")]
    MultiWordForm { form: String },

    #[error("phrase element needs at least one word")]
    EmptyPhrase,

    #[error("disjunction needs at least one alternative")]
    EmptyDisjunction,

    #[error("pattern has no elements")]
    EmptyPattern,

    #[error("rejoinders of rule '{rule}' failed to build")]
    Rejoinder {
        rule: String,
        #[source]
        source: Box<BuildError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("language '{0}' is not supported by this tokenizer")]
    UnsupportedLanguage(Language),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conversation store failure: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
