//! Turn metrics.
//!
//! Collected by every turn and surfaced through
//! [`ChatEngine::perform_verbose`](crate::ChatEngine::perform_verbose) for
//! debugging rule sets: which candidate set answered, how many rules were
//! looked at, and where the time went.

use std::time::Duration;

/// Which candidate set produced the firing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Rejoinders of the previously fired rule.
    Rejoinders,
    /// The topic's top-level rules (including fallback from rejoinders).
    TopLevel,
}

#[derive(Debug, Default, Clone)]
pub struct TurnMetrics {
    /// Time spent evaluating and firing rules.
    pub selection: Duration,
    /// Rules whose eligibility was evaluated.
    pub rules_evaluated: usize,
    /// Rules whose pattern was run (conditions held, history allowed it).
    pub patterns_run: usize,
    /// Whether a rejoinder set was tried and abandoned for the top level.
    pub fell_back: bool,
}
