//! Pattern matching and rule selection engine.
//!
//! The engine is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! One conversation turn flows through the engine like this:
//!
//! ```text
//! raw input ── Tokenizer::tokenize ──> Utterance { raw, tokens }
//!                                            │
//!                                            v
//!                          select_and_fire (selection.rs)
//!                            - candidate set: rejoinders or top level
//!                            - per rule: conditions ─┐
//!                                                    v
//!                                   match_pattern (matcher.rs)
//!                                     - Cursor (cursor.rs)
//!                                     - PatternElement::match_at (element.rs)
//!                                                    │
//!                                                    v
//!                            - first eligible rule fires
//!                              (pre-actions, post-actions, render)
//!                                            │
//!                                            v
//!                                 Firing + TurnMetrics (metrics.rs)
//! ```
//!
//! Matching is greedy-forward: each element may skip leading tokens that do
//! not fit, but a later failure never sends an earlier element back to try a
//! different position.
//!
//! ## Responsibilities by module
//!
//! - `cursor.rs`: the utterance and the value-typed position into its tokens.
//! - `element.rs`: the closed set of pattern elements and their match logic.
//! - `pattern.rs`: `Pattern` plus the builders that validate and assemble it.
//! - `matcher.rs`: the element-retry loop shared by patterns and disjunctions.
//! - `selection.rs`: eligibility, candidate sets, firing.
//! - `metrics.rs`: timing and counters for verbose turns.

#[path = "engine/cursor.rs"]
mod cursor;
#[path = "engine/element.rs"]
mod element;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/pattern.rs"]
mod pattern;
#[path = "engine/selection.rs"]
mod selection;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use cursor::{Cursor, Utterance};
pub use element::{PatternElement, PhraseOrder};
pub use matcher::{MatchResult, match_pattern};
pub use metrics::{CandidateSource, TurnMetrics};
pub use pattern::{DisjunctionBuilder, Pattern, PatternBuilder};
pub(crate) use selection::{fire, select_and_fire};
