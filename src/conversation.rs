//! Per-user conversation state.
//!
//! A [`Conversation`] is what the store persists between turns. Rules are
//! referenced by [`RulePath`] rather than by pointer, so the state stays a
//! plain value that can be cloned, stored and handed across threads
//! independently of the bot that owns the rules.

use chrono::{DateTime, Local};
use std::fmt;

/// Position of a rule in a topic's rule tree.
///
/// `[2]` is the third top-level rule, `[2, 0]` its first rejoinder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RulePath(Vec<usize>);

impl RulePath {
    pub fn root(idx: usize) -> Self {
        RulePath(vec![idx])
    }

    pub fn child(&self, idx: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(idx);
        RulePath(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth; top-level rules have depth 1.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for RulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(usize::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// Where the next turn looks for rules first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CandidateSet {
    /// The topic's top-level rules.
    #[default]
    TopLevel,
    /// The rejoinders of the rule at this path.
    Rejoinders(RulePath),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

/// One entry of the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Local>,
}

impl Message {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Message { speaker, text: text.into(), at: Local::now() }
    }
}

/// State of one user's conversation with a bot.
///
/// `C` is the bot-defined context record; a fresh conversation starts from
/// `C::default()`.
#[derive(Debug, Clone)]
pub struct Conversation<C> {
    pub user_id: String,
    pub context: C,
    messages: Vec<Message>,
    fired: Vec<RulePath>,
    candidates: CandidateSet,
}

impl<C: Default> Conversation<C> {
    pub fn new(user_id: impl Into<String>) -> Self {
        Conversation {
            user_id: user_id.into(),
            context: C::default(),
            messages: Vec::new(),
            fired: Vec::new(),
            candidates: CandidateSet::TopLevel,
        }
    }
}

impl<C> Conversation<C> {
    /// Message log, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Rules that have fired, oldest first.
    pub fn fired(&self) -> &[RulePath] {
        &self.fired
    }

    pub fn has_fired(&self, path: &RulePath) -> bool {
        self.fired.contains(path)
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub(crate) fn record_message(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.messages.push(Message::new(speaker, text));
    }

    pub(crate) fn record_fired(&mut self, path: RulePath, next: CandidateSet) {
        self.fired.push(path);
        self.candidates = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_conversation_starts_at_top_level() {
        let conversation = Conversation::<Vec<String>>::new("alice");
        assert_eq!(conversation.user_id, "alice");
        assert!(conversation.context.is_empty());
        assert!(conversation.messages().is_empty());
        assert!(conversation.fired().is_empty());
        assert_eq!(conversation.candidates(), &CandidateSet::TopLevel);
    }

    #[test]
    fn recording_a_firing_moves_the_candidate_set() {
        let mut conversation = Conversation::<()>::new("bob");
        let path = RulePath::root(3);
        conversation.record_fired(path.clone(), CandidateSet::Rejoinders(path.clone()));

        assert!(conversation.has_fired(&path));
        assert!(!conversation.has_fired(&path.child(0)));
        assert_eq!(conversation.candidates(), &CandidateSet::Rejoinders(path));
    }

    #[test]
    fn message_log_is_append_only() {
        let mut conversation = Conversation::<()>::new("carol");
        conversation.record_message(Speaker::User, "hi");
        conversation.record_message(Speaker::Bot, "hello");

        let texts: Vec<(Speaker, &str)> = conversation.messages().iter().map(|m| (m.speaker, m.text.as_str())).collect();
        assert_eq!(texts, vec![(Speaker::User, "hi"), (Speaker::Bot, "hello")]);
        assert!(conversation.messages()[0].at <= conversation.messages()[1].at);
    }

    #[test]
    fn rule_path_displays_dotted() {
        assert_eq!(RulePath::root(1).child(0).child(4).to_string(), "1.0.4");
        assert_eq!(RulePath::root(1).child(0).depth(), 2);
    }
}
