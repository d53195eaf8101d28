//! Topics and rejoinder capture.
//!
//! A topic owns an ordered list of top-level rules plus a stack of
//! *collectors*. While a collector is on the stack, [`Topic::add_rule`]
//! appends to the innermost collector instead of the topic's own list:
//!
//! ```text
//! topic.rule("greet")...rejoinder(|t| {        collectors: [ [] ]
//!     t.rule("name")...rejoinder(|t| {         collectors: [ [], [] ]
//!         t.rule("confirm")...add()            collectors: [ [], [confirm] ]
//!     }).add()                                 collectors: [ [name] ]
//! }).add()                                     collectors: []   rules: [greet]
//! ```
//!
//! Collectors are pushed and popped through [`Capture`], whose `Drop` pops on
//! every exit path: an action returning `Err` or unwinding cannot leave the
//! topic stuck in capturing mode.

use super::{Rule, RuleBuilder};
use crate::conversation::RulePath;
use std::ops::{Deref, DerefMut};

pub struct Topic<C> {
    name: String,
    rules: Vec<Rule<C>>,
    collectors: Vec<Vec<Rule<C>>>,
}

impl<C> Topic<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Topic { name: name.into(), rules: Vec::new(), collectors: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level rules in declaration order.
    pub fn rules(&self) -> &[Rule<C>] {
        &self.rules
    }

    /// Start building a rule owned by this topic.
    pub fn rule(&mut self, name: impl Into<String>) -> RuleBuilder<'_, C> {
        RuleBuilder::new(self, name.into())
    }

    /// Add a finished rule: to the innermost active collector if there is
    /// one, otherwise to the top-level list.
    pub fn add_rule(&mut self, rule: Rule<C>) {
        match self.collectors.last_mut() {
            Some(collector) => collector.push(rule),
            None => self.rules.push(rule),
        }
    }

    /// Whether a rejoinder capture is in progress.
    pub fn is_capturing(&self) -> bool {
        !self.collectors.is_empty()
    }

    pub(crate) fn capture(&mut self) -> Capture<'_, C> {
        let depth = self.collectors.len();
        self.collectors.push(Vec::new());
        Capture { topic: self, depth, finished: false }
    }

    /// Resolve a path produced by selection back to its rule.
    pub fn rule_at(&self, path: &RulePath) -> Option<&Rule<C>> {
        let (first, rest) = path.indices().split_first()?;
        rest.iter().try_fold(self.rules.get(*first)?, |rule, &idx| rule.rejoinders.get(idx))
    }

    /// Every rule of the tree, depth-first, paired with its path.
    pub fn walk(&self) -> Vec<(RulePath, &Rule<C>)> {
        fn visit<'r, C>(rules: &'r [Rule<C>], parent: Option<&RulePath>, out: &mut Vec<(RulePath, &'r Rule<C>)>) {
            for (idx, rule) in rules.iter().enumerate() {
                let path = match parent {
                    Some(parent) => parent.child(idx),
                    None => RulePath::root(idx),
                };
                out.push((path.clone(), rule));
                visit(&rule.rejoinders, Some(&path), out);
            }
        }

        let mut out = Vec::new();
        visit(&self.rules, None, &mut out);
        out
    }
}

impl<C> std::fmt::Debug for Topic<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .field("capturing", &self.collectors.len())
            .finish()
    }
}

/// An active collector on a topic. Derefs to the topic so rules built through
/// it land in the collector.
pub(crate) struct Capture<'t, C> {
    topic: &'t mut Topic<C>,
    depth: usize,
    finished: bool,
}

impl<C> Capture<'_, C> {
    /// Pop the collector and hand back what it captured, in capture order.
    pub(crate) fn finish(mut self) -> Vec<Rule<C>> {
        self.topic.collectors.truncate(self.depth + 1);
        let captured = self.topic.collectors.pop().unwrap_or_default();
        self.finished = true;
        captured
    }
}

impl<C> Deref for Capture<'_, C> {
    type Target = Topic<C>;

    fn deref(&self) -> &Topic<C> {
        self.topic
    }
}

impl<C> DerefMut for Capture<'_, C> {
    fn deref_mut(&mut self) -> &mut Topic<C> {
        self.topic
    }
}

impl<C> Drop for Capture<'_, C> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(topic = %self.topic.name, depth = self.depth, "rejoinder capture abandoned");
            self.topic.collectors.truncate(self.depth);
        }
    }
}
