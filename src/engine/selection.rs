//! Rule selection and firing.
//!
//! One turn, given the topic, the conversation and the tokenized utterance:
//!
//! ```text
//! candidates = Rejoinders(p)? ──> rejoinders of rule p
//!                │                  └─ none eligible ──┐
//!                └─ TopLevel ─────────────────────────>┴─> topic.rules()
//!
//! eligible(rule) = history allows it
//!                ∧ all conditions hold
//!                ∧ (no pattern ∨ pattern matches)
//!
//! first eligible ─> pre-actions ─> post-actions(match) ─> render
//!                ─> history += path, candidates = Rejoinders(path) | TopLevel
//! ```
//!
//! A rule that already fired stays eligible only when it is both `KEEP` and
//! `REPEAT`. When nothing is eligible the conversation is left untouched.

use super::cursor::Utterance;
use super::matcher::MatchResult;
use super::metrics::{CandidateSource, TurnMetrics};
use crate::conversation::{CandidateSet, Conversation, RulePath};
use crate::rules::{Rule, Topic};
use std::time::Instant;

/// Outcome of a turn in which a rule fired.
#[derive(Debug, Clone)]
pub(crate) struct Firing {
    pub path: RulePath,
    pub rule_name: String,
    pub text: String,
    pub result: MatchResult,
    pub source: CandidateSource,
}

/// Pick the first eligible rule for `utterance` and fire it, updating the
/// conversation's history and candidate set.
pub(crate) fn select_and_fire<C>(
    topic: &Topic<C>,
    conversation: &mut Conversation<C>,
    utterance: &Utterance,
    metrics: &mut TurnMetrics,
) -> Option<Firing> {
    let start = Instant::now();
    let selected = select(topic, conversation, utterance, metrics);

    let firing = selected.map(|(path, rule, result, source)| {
        let text = fire(rule, &mut conversation.context, utterance, &result);
        let next = if rule.rejoinders().is_empty() {
            CandidateSet::TopLevel
        } else {
            CandidateSet::Rejoinders(path.clone())
        };
        tracing::debug!(rule = %rule.name(), path = %path, ?source, ?next, "rule fired");
        conversation.record_fired(path.clone(), next);
        Firing { path, rule_name: rule.name().to_string(), text, result, source }
    });

    if firing.is_none() {
        tracing::debug!(topic = %topic.name(), input = %utterance.raw(), "no eligible rule");
    }
    metrics.selection = start.elapsed();
    firing
}

/// Run a rule's actions and render its reply.
///
/// Pre-actions see the utterance, post-actions the match result; the
/// renderer sees the context after both.
pub(crate) fn fire<C>(rule: &Rule<C>, context: &mut C, utterance: &Utterance, result: &MatchResult) -> String {
    for action in &rule.pre_actions {
        action(utterance, context);
    }
    for action in &rule.post_actions {
        action(context, result);
    }
    rule.render(context)
}

type Selected<'r, C> = (RulePath, &'r Rule<C>, MatchResult, CandidateSource);

fn select<'r, C>(
    topic: &'r Topic<C>,
    conversation: &Conversation<C>,
    utterance: &Utterance,
    metrics: &mut TurnMetrics,
) -> Option<Selected<'r, C>> {
    if let CandidateSet::Rejoinders(parent_path) = conversation.candidates() {
        match topic.rule_at(parent_path) {
            Some(parent) if !parent.rejoinders().is_empty() => {
                let candidates =
                    parent.rejoinders().iter().enumerate().map(|(idx, rule)| (parent_path.child(idx), rule));
                if let Some((path, rule, result)) = first_eligible(candidates, conversation, utterance, metrics) {
                    return Some((path, rule, result, CandidateSource::Rejoinders));
                }
                tracing::debug!(parent = %parent.name(), "no eligible rejoinder, falling back to top level");
                metrics.fell_back = true;
            }
            _ => tracing::warn!(path = %parent_path, "candidate set points at a rule without rejoinders"),
        }
    }

    let candidates = topic.rules().iter().enumerate().map(|(idx, rule)| (RulePath::root(idx), rule));
    first_eligible(candidates, conversation, utterance, metrics)
        .map(|(path, rule, result)| (path, rule, result, CandidateSource::TopLevel))
}

fn first_eligible<'r, C>(
    candidates: impl Iterator<Item = (RulePath, &'r Rule<C>)>,
    conversation: &Conversation<C>,
    utterance: &Utterance,
    metrics: &mut TurnMetrics,
) -> Option<(RulePath, &'r Rule<C>, MatchResult)> {
    for (path, rule) in candidates {
        if let Some(result) = eligibility(rule, &path, conversation, utterance, metrics) {
            return Some((path, rule, result));
        }
    }
    None
}

/// `Some(match result)` when `rule` may fire for this utterance.
fn eligibility<C>(
    rule: &Rule<C>,
    path: &RulePath,
    conversation: &Conversation<C>,
    utterance: &Utterance,
    metrics: &mut TurnMetrics,
) -> Option<MatchResult> {
    metrics.rules_evaluated += 1;

    if conversation.has_fired(path) && !(rule.keep() && rule.repeat()) {
        tracing::trace!(rule = %rule.name(), keep = rule.keep(), repeat = rule.repeat(), "already fired");
        return None;
    }
    if !rule.conditions_hold(&conversation.context, utterance) {
        tracing::trace!(rule = %rule.name(), "conditions rejected");
        return None;
    }
    if rule.pattern().is_some() {
        metrics.patterns_run += 1;
    }
    let result = rule.match_utterance(utterance);
    tracing::trace!(rule = %rule.name(), matched = result.matched, extracted = ?result.extracted, "pattern evaluated");
    result.matched.then_some(result)
}
