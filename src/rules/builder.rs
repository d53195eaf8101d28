use super::{Condition, PostAction, PreAction, Renderer, Rule, RuleFlags, RuleTest, Topic};
use crate::engine::{MatchResult, Pattern, PatternBuilder, Utterance};
use crate::BuildError;
use regex::{Captures, Regex};

/// Fluent builder for one [`Rule`], scoped to the topic that will own it.
///
/// Configuration accumulates in call order; the rule itself is only
/// constructed by [`add`](Self::add) (or [`build`](Self::build)). Mistakes
/// such as an invalid regex are recorded when the offending method is called
/// and reported by `add`, the first one winning.
pub struct RuleBuilder<'t, C> {
    topic: &'t mut Topic<C>,
    name: String,
    conditions: Vec<Condition<C>>,
    pattern: Option<Pattern>,
    pre_actions: Vec<PreAction<C>>,
    render: Option<Renderer<C>>,
    post_actions: Vec<PostAction<C>>,
    flags: RuleFlags,
    rejoinders: Vec<Rule<C>>,
    tests: Vec<RuleTest>,
    error: Option<BuildError>,
}

impl<'t, C> RuleBuilder<'t, C> {
    pub(crate) fn new(topic: &'t mut Topic<C>, name: String) -> Self {
        RuleBuilder {
            topic,
            name,
            conditions: Vec::new(),
            pattern: None,
            pre_actions: Vec::new(),
            render: None,
            post_actions: Vec::new(),
            flags: RuleFlags::default(),
            rejoinders: Vec::new(),
            tests: Vec::new(),
            error: None,
        }
    }

    /// Keep the rule selectable after it has fired.
    pub fn keep(mut self, keep: bool) -> Self {
        self.flags.set(RuleFlags::KEEP, keep);
        self
    }

    /// Allow the same output to be produced more than once.
    pub fn repeat(mut self, repeat: bool) -> Self {
        self.flags.set(RuleFlags::REPEAT, repeat);
        self
    }

    /// Add a condition over the conversation context and the utterance.
    pub fn when(mut self, condition: impl Fn(&C, &Utterance) -> bool + Send + Sync + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    /// Add a condition that holds when `pattern` matches anywhere in the raw
    /// input. The regex is compiled here, once.
    pub fn when_regex(mut self, pattern: &str) -> Self {
        if let Some(regex) = self.compile(pattern) {
            self.conditions.push(Box::new(move |_, utterance| regex.is_match(utterance.raw())));
        }
        self
    }

    /// Like [`when_regex`](Self::when_regex); when the rule fires, the first
    /// match's captures are handed to `action` together with the context.
    pub fn when_regex_then(
        mut self,
        pattern: &str,
        action: impl Fn(&mut C, &Captures<'_>) + Send + Sync + 'static,
    ) -> Self {
        if let Some(regex) = self.compile(pattern) {
            let capture_regex = regex.clone();
            self.conditions.push(Box::new(move |_, utterance| regex.is_match(utterance.raw())));
            self.pre_actions.push(Box::new(move |utterance, context| {
                if let Some(captures) = capture_regex.captures(utterance.raw()) {
                    action(context, &captures);
                }
            }));
        }
        self
    }

    /// Set the token pattern.
    ///
    /// ```ignore
    /// topic.rule("location").pattern(|p| p.word(["i", "we"]).word(["am", "are"]).wildcard())
    /// ```
    pub fn pattern(mut self, f: impl FnOnce(PatternBuilder) -> PatternBuilder) -> Self {
        match f(PatternBuilder::new()).build() {
            Ok(pattern) => self.pattern = Some(pattern),
            Err(err) => self.fail(err),
        }
        self
    }

    /// Add a pre-action, run when the rule fires, before rendering.
    pub fn does(mut self, action: impl Fn(&Utterance, &mut C) + Send + Sync + 'static) -> Self {
        self.pre_actions.push(Box::new(action));
        self
    }

    /// Add a post-action; it receives the pattern's match result.
    pub fn then(mut self, action: impl Fn(&mut C, &MatchResult) + Send + Sync + 'static) -> Self {
        self.post_actions.push(Box::new(action));
        self
    }

    /// Reply with fixed text.
    pub fn output(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.render = Some(Box::new(move |_| text.clone()));
        self
    }

    /// Reply with text rendered from the context.
    pub fn output_with(mut self, render: impl Fn(&C) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    /// Attach an example exchange to the rule.
    pub fn with_test(mut self, input: impl Into<String>, expected: impl Into<String>) -> Self {
        self.tests.push(RuleTest { input: input.into(), expected: expected.into() });
        self
    }

    /// Build follow-up rules that only become reachable after this rule has
    /// fired. Rules added to the topic inside `action` are captured as this
    /// rule's rejoinders, in the order they were added.
    pub fn rejoinder(mut self, action: impl FnOnce(&mut Topic<C>) -> Result<(), BuildError>) -> Self {
        let mut capture = self.topic.capture();
        match action(&mut capture) {
            Ok(()) => {
                let captured = capture.finish();
                self.rejoinders.extend(captured);
            }
            Err(source) => {
                drop(capture);
                let rule = self.name.clone();
                self.fail(BuildError::Rejoinder { rule, source: Box::new(source) });
            }
        }
        self
    }

    /// Validate and add the rule to its topic (or to the active rejoinder
    /// capture).
    pub fn add(self) -> Result<(), BuildError> {
        let (topic, rule) = self.finish()?;
        tracing::debug!(rule = %rule.name, topic = %topic.name(), captured = topic.is_capturing(), "rule added");
        topic.add_rule(rule);
        Ok(())
    }

    /// Validate and return the rule without adding it anywhere.
    pub fn build(self) -> Result<Rule<C>, BuildError> {
        self.finish().map(|(_, rule)| rule)
    }

    fn finish(self) -> Result<(&'t mut Topic<C>, Rule<C>), BuildError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let render = self.render.ok_or_else(|| BuildError::MissingOutput { rule: self.name.clone() })?;
        let rule = Rule {
            name: self.name,
            conditions: self.conditions,
            pattern: self.pattern,
            pre_actions: self.pre_actions,
            render,
            post_actions: self.post_actions,
            flags: self.flags,
            rejoinders: self.rejoinders,
            tests: self.tests,
        };
        Ok((self.topic, rule))
    }

    fn compile(&mut self, pattern: &str) -> Option<Regex> {
        match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(source) => {
                self.fail(BuildError::InvalidRegex { pattern: pattern.to_string(), source });
                None
            }
        }
    }

    fn fail(&mut self, err: BuildError) {
        self.error.get_or_insert(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PartOfSpeech, Token};

    #[derive(Debug, Default, Clone)]
    struct Ctx {
        city: Option<String>,
        log: Vec<&'static str>,
    }

    fn utterance(raw: &str, tokens: Vec<Token>) -> Utterance {
        Utterance::new(raw, tokens)
    }

    #[test]
    fn defaults_keep_without_repeat() {
        let mut topic = Topic::<Ctx>::new("t");
        let rule = topic.rule("r").output("x").build().unwrap();
        assert!(rule.keep());
        assert!(!rule.repeat());
        assert_eq!(rule.flags(), RuleFlags::KEEP);
    }

    #[test]
    fn flags_follow_builder_calls() {
        let mut topic = Topic::<Ctx>::new("t");
        let rule = topic.rule("r").keep(false).repeat(true).output("x").build().unwrap();
        assert_eq!(rule.flags(), RuleFlags::REPEAT);
    }

    #[test]
    fn missing_output_is_rejected() {
        let mut topic = Topic::<Ctx>::new("t");
        let err = topic.rule("silent").pattern(|p| p.wildcard()).add().unwrap_err();
        assert!(matches!(err, BuildError::MissingOutput { ref rule } if rule == "silent"));
        assert!(topic.rules().is_empty());
    }

    #[test]
    fn invalid_regex_fails_at_construction() {
        let mut topic = Topic::<Ctx>::new("t");
        let err = topic.rule("bad").when_regex("(unclosed").output("x").add().unwrap_err();
        assert!(matches!(err, BuildError::InvalidRegex { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn invalid_pattern_fails_at_construction() {
        let mut topic = Topic::<Ctx>::new("t");
        let err = topic.rule("bad").pattern(|p| p.word(Vec::<String>::new())).output("x").add().unwrap_err();
        assert!(matches!(err, BuildError::EmptyWordSet));
    }

    #[test]
    fn last_output_wins() {
        let mut topic = Topic::<Ctx>::new("t");
        let rule = topic.rule("r").output("first").output_with(|_| "second".to_string()).build().unwrap();
        assert_eq!(rule.render(&Ctx::default()), "second");
    }

    #[test]
    fn regex_condition_matches_anywhere_in_raw_text() {
        let mut topic = Topic::<Ctx>::new("t");
        let rule = topic.rule("r").when_regex(r"\d{3}").output("x").build().unwrap();
        let ctx = Ctx::default();

        assert!(rule.conditions_hold(&ctx, &utterance("call 555 now", Vec::new())));
        assert!(!rule.conditions_hold(&ctx, &utterance("call me", Vec::new())));
    }

    #[test]
    fn conditions_are_conjunctive() {
        let mut topic = Topic::<Ctx>::new("t");
        let rule = topic
            .rule("r")
            .when(|ctx: &Ctx, _| ctx.city.is_some())
            .when_regex("hello")
            .output("x")
            .build()
            .unwrap();
        let hello = utterance("hello", Vec::new());

        assert!(!rule.conditions_hold(&Ctx::default(), &hello));
        assert!(rule.conditions_hold(&Ctx { city: Some("Sumy".into()), ..Ctx::default() }, &hello));
    }

    #[test]
    fn rule_without_pattern_matches_everything() {
        let mut topic = Topic::<Ctx>::new("t");
        let rule = topic.rule("r").output("x").build().unwrap();
        let result = rule.match_utterance(&utterance("", Vec::new()));
        assert!(result.matched);
        assert!(result.extracted.is_empty());
    }

    #[test]
    fn actions_accumulate_in_call_order() {
        let mut topic = Topic::<Ctx>::new("t");
        let rule = topic
            .rule("r")
            .pattern(|p| p.pos(PartOfSpeech::Adp).wildcard())
            .does(|_, ctx: &mut Ctx| ctx.log.push("pre-1"))
            .does(|_, ctx: &mut Ctx| ctx.log.push("pre-2"))
            .then(|ctx: &mut Ctx, result| ctx.city = result.get(0).map(str::to_string))
            .output_with(|ctx: &Ctx| format!("{:?}", ctx.city))
            .build()
            .unwrap();

        assert_eq!(rule.pre_actions.len(), 2);
        assert_eq!(rule.post_actions.len(), 1);
        assert_eq!(rule.pattern().map(Pattern::len), Some(2));
    }
}
