use crate::conversation::{Conversation, RulePath, Speaker};
use crate::engine::{self, CandidateSource, MatchResult, TurnMetrics, Utterance};
use crate::error::{TokenizeError, TurnError};
use crate::rules::Topic;
use crate::store::ConversationStore;
use crate::tokenize::{Language, LexiconTokenizer, Tokenizer};
use crate::Token;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Options that affect how turns are processed.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Language handed to the built-in tokenizer.
    pub language: Language,
}

/// A conversational bot: a context type and the topic whose rules drive it.
pub trait Bot {
    /// Per-user state the bot's rules read and write.
    type Context: Default + Clone + Send;

    fn topic(&self) -> &Topic<Self::Context>;
}

/// Result of one turn.
///
/// `text` is empty and `rule` is `None` when no rule was eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Name of the rule that fired.
    pub rule: Option<String>,
    /// Variables extracted by the firing rule's pattern.
    pub extracted: Vec<String>,
}

impl Reply {
    fn silent() -> Self {
        Reply { text: String::new(), rule: None, extracted: Vec::new() }
    }

    /// Whether no rule answered.
    pub fn is_silent(&self) -> bool {
        self.rule.is_none()
    }
}

/// Additional details returned by [`ChatEngine::perform_verbose`].
#[derive(Debug, Clone)]
pub struct TurnDetails {
    /// Total elapsed time, including store access.
    pub total: Duration,
    /// Time spent in the tokenizer.
    pub tokenize: Duration,
    /// Tokens the rules were matched against.
    pub tokens: Vec<Token>,
    /// Selection counters and timing.
    pub metrics: TurnMetrics,
    /// Candidate set and path of the firing rule.
    pub source: Option<CandidateSource>,
    pub path: Option<RulePath>,
}

/// Turn entry point: owns the tokenizer and the store, and serializes turns
/// per user.
///
/// # Example
/// ```
/// use fluency::{Bot, ChatEngine, InMemoryConversationStore, LexiconTokenizer, Topic};
///
/// struct Echo(Topic<()>);
///
/// impl Bot for Echo {
///     type Context = ();
///     fn topic(&self) -> &Topic<()> {
///         &self.0
///     }
/// }
///
/// let mut topic = Topic::new("echo");
/// topic.rule("hi").pattern(|p| p.word(["hi"])).output("Hello!").add().unwrap();
///
/// let engine = ChatEngine::new(LexiconTokenizer::default(), InMemoryConversationStore::new());
/// let reply = engine.perform(&Echo(topic), "hi there", "alice").unwrap();
/// assert_eq!(reply.text, "Hello!");
/// ```
pub struct ChatEngine<T, S> {
    tokenizer: T,
    store: S,
    turns: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S> ChatEngine<LexiconTokenizer, S> {
    /// Engine over the built-in tokenizer configured by `options`.
    pub fn with_options(options: &Options, store: S) -> Self {
        Self::new(LexiconTokenizer::new(options.language), store)
    }
}

impl<T: Tokenizer, S> ChatEngine<T, S> {
    pub fn new(tokenizer: T, store: S) -> Self {
        ChatEngine { tokenizer, store, turns: Mutex::new(HashMap::new()) }
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one user utterance and return the bot's reply.
    ///
    /// A turn where no rule is eligible succeeds with a silent [`Reply`];
    /// errors are reserved for tokenizer and store failures.
    pub fn perform<B>(&self, bot: &B, raw_input: &str, user_id: &str) -> Result<Reply, TurnError>
    where
        B: Bot,
        S: ConversationStore<B::Context>,
    {
        self.perform_verbose(bot, raw_input, user_id).map(|(reply, _)| reply)
    }

    /// Like [`perform`](Self::perform), also returning timings and selection details.
    pub fn perform_verbose<B>(&self, bot: &B, raw_input: &str, user_id: &str) -> Result<(Reply, TurnDetails), TurnError>
    where
        B: Bot,
        S: ConversationStore<B::Context>,
    {
        let start = Instant::now();
        let turn = self.turn_lock(user_id);
        let outcome = {
            // The guard protects no data; a turn that panicked saved nothing.
            let _guard = turn.lock().unwrap_or_else(PoisonError::into_inner);
            self.run_turn(bot, raw_input, user_id, start)
        };
        drop(turn);
        self.release_turn_lock(user_id);
        outcome
    }

    fn run_turn<B>(
        &self,
        bot: &B,
        raw_input: &str,
        user_id: &str,
        start: Instant,
    ) -> Result<(Reply, TurnDetails), TurnError>
    where
        B: Bot,
        S: ConversationStore<B::Context>,
    {
        let mut conversation: Conversation<B::Context> = self.store.load(user_id)?;

        let tokenize_start = Instant::now();
        let tokens = self.tokenizer.tokenize(raw_input)?;
        let tokenize = tokenize_start.elapsed();

        let utterance = Utterance::new(raw_input, tokens);
        conversation.record_message(Speaker::User, raw_input);

        let mut metrics = TurnMetrics::default();
        let firing = engine::select_and_fire(bot.topic(), &mut conversation, &utterance, &mut metrics);

        let (reply, source, path) = match firing {
            Some(firing) => {
                conversation.record_message(Speaker::Bot, firing.text.as_str());
                let reply = Reply { text: firing.text, rule: Some(firing.rule_name), extracted: firing.result.extracted };
                (reply, Some(firing.source), Some(firing.path))
            }
            None => (Reply::silent(), None, None),
        };

        self.store.save(&conversation)?;
        tracing::debug!(user = %user_id, rule = ?reply.rule, elapsed = ?start.elapsed(), "turn complete");

        let details = TurnDetails {
            total: start.elapsed(),
            tokenize,
            tokens: utterance.tokens().to_vec(),
            metrics,
            source,
            path,
        };
        Ok((reply, details))
    }

    fn turn_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(turns.entry(user_id.to_string()).or_default())
    }

    /// Drop the user's lock once no other turn holds or waits on it.
    fn release_turn_lock(&self, user_id: &str) {
        let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
        if turns.get(user_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            turns.remove(user_id);
        }
    }
}

/// Outcome of one example test attached with
/// [`RuleBuilder::with_test`](crate::RuleBuilder::with_test).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTestOutcome {
    pub path: RulePath,
    pub rule: String,
    pub input: String,
    pub expected: String,
    /// Rendered output, `None` when the rule was not eligible for the input.
    pub actual: Option<String>,
    pub passed: bool,
}

/// Run every rule's example tests, rejoinders included.
///
/// Each test is evaluated against its own rule alone, from a fresh default
/// context and ignoring history: conditions, pattern, actions, render.
pub fn verify_rules<C, T>(topic: &Topic<C>, tokenizer: &T) -> Result<Vec<RuleTestOutcome>, TokenizeError>
where
    C: Default,
    T: Tokenizer + ?Sized,
{
    let mut outcomes = Vec::new();

    for (path, rule) in topic.walk() {
        for test in rule.tests() {
            let utterance = Utterance::new(test.input.as_str(), tokenizer.tokenize(&test.input)?);
            let mut context = C::default();

            let result: MatchResult = if rule.conditions_hold(&context, &utterance) {
                rule.match_utterance(&utterance)
            } else {
                MatchResult::failure()
            };
            let actual = result.matched.then(|| engine::fire(rule, &mut context, &utterance, &result));
            let passed = actual.as_deref() == Some(test.expected.as_str());
            if !passed {
                tracing::warn!(rule = %rule.name(), input = %test.input, ?actual, "rule example failed");
            }

            outcomes.push(RuleTestOutcome {
                path: path.clone(),
                rule: rule.name().to_string(),
                input: test.input.clone(),
                expected: test.expected.clone(),
                actual,
                passed,
            });
        }
    }

    Ok(outcomes)
}
