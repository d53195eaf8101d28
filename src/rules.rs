//! Rules, topics and the fluent rule builder.
//!
//! A [`Rule`] bundles everything needed to answer one kind of utterance:
//!
//! ```text
//! Rule
//!  ├─ conditions     all must hold (AND)       when / when_regex
//!  ├─ pattern        optional token pattern    pattern
//!  ├─ pre-actions    run before rendering      does / when_regex_then
//!  ├─ render         context -> reply text     output / output_with
//!  ├─ post-actions   receive the MatchResult   then
//!  ├─ flags          KEEP | REPEAT             keep / repeat
//!  ├─ rejoinders     follow-up rules (a tree)  rejoinder
//!  └─ tests          example (input, reply)    with_test
//! ```
//!
//! Rules are never constructed directly: [`Topic::rule`] hands out a
//! [`RuleBuilder`], and [`RuleBuilder::add`] validates the configuration and
//! places the finished rule in the topic, or in the parent rule's rejoinders
//! while a rejoinder capture is active.

#[path = "rules/builder.rs"]
mod builder;
#[path = "rules/topic.rs"]
mod topic;

pub use builder::RuleBuilder;
pub use topic::Topic;

use crate::engine::{MatchResult, Pattern, Utterance, match_pattern};
use std::fmt;

pub(crate) type Condition<C> = Box<dyn Fn(&C, &Utterance) -> bool + Send + Sync>;
pub(crate) type PreAction<C> = Box<dyn Fn(&Utterance, &mut C) + Send + Sync>;
pub(crate) type PostAction<C> = Box<dyn Fn(&mut C, &MatchResult) + Send + Sync>;
pub(crate) type Renderer<C> = Box<dyn Fn(&C) -> String + Send + Sync>;

bitflags::bitflags! {
    /// Replay behavior of a rule once it has fired in a conversation.
    ///
    /// A rule that has fired stays selectable only when both bits are set:
    /// without `KEEP` it is retired, without `REPEAT` its output is not
    /// shown twice.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RuleFlags: u8 {
        const KEEP   = 1 << 0;
        const REPEAT = 1 << 1;
    }
}

impl Default for RuleFlags {
    fn default() -> Self {
        RuleFlags::KEEP
    }
}

/// An example exchange attached to a rule with
/// [`RuleBuilder::with_test`]; checked by [`verify_rules`](crate::verify_rules).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTest {
    pub input: String,
    pub expected: String,
}

pub struct Rule<C> {
    pub(crate) name: String,
    pub(crate) conditions: Vec<Condition<C>>,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) pre_actions: Vec<PreAction<C>>,
    pub(crate) render: Renderer<C>,
    pub(crate) post_actions: Vec<PostAction<C>>,
    pub(crate) flags: RuleFlags,
    pub(crate) rejoinders: Vec<Rule<C>>,
    pub(crate) tests: Vec<RuleTest>,
}

impl<C> Rule<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn flags(&self) -> RuleFlags {
        self.flags
    }

    pub fn keep(&self) -> bool {
        self.flags.contains(RuleFlags::KEEP)
    }

    pub fn repeat(&self) -> bool {
        self.flags.contains(RuleFlags::REPEAT)
    }

    /// Follow-up rules, reachable only right after this rule fired.
    pub fn rejoinders(&self) -> &[Rule<C>] {
        &self.rejoinders
    }

    pub fn tests(&self) -> &[RuleTest] {
        &self.tests
    }

    /// Whether every condition holds (vacuously true without conditions).
    pub fn conditions_hold(&self, context: &C, utterance: &Utterance) -> bool {
        self.conditions.iter().all(|condition| condition(context, utterance))
    }

    /// Run the pattern against `utterance`; a rule without a pattern matches
    /// everything and extracts nothing.
    pub fn match_utterance(&self, utterance: &Utterance) -> MatchResult {
        match &self.pattern {
            Some(pattern) => match_pattern(pattern, utterance.cursor()),
            None => MatchResult::success(Vec::new()),
        }
    }

    /// Render the reply for `context`.
    pub fn render(&self, context: &C) -> String {
        (self.render)(context)
    }
}

impl<C> fmt::Debug for Rule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("conditions", &self.conditions.len())
            .field("pattern", &self.pattern.as_ref().map(Pattern::describe))
            .field("render", &"<function>")
            .field("flags", &self.flags)
            .field("rejoinders", &self.rejoinders)
            .field("tests", &self.tests.len())
            .finish()
    }
}
