use super::{MatchResult, Pattern, PatternBuilder, PhraseOrder, Utterance, match_pattern};
use crate::{LexiconTokenizer, PartOfSpeech, Tokenizer, Topic};
use rstest::rstest;

fn utterance(text: &str) -> Utterance {
    let tokens = LexiconTokenizer::default().tokenize(text).unwrap();
    Utterance::new(text, tokens)
}

fn run(pattern: &Pattern, text: &str) -> MatchResult {
    match_pattern(pattern, utterance(text).cursor())
}

fn pattern(f: impl FnOnce(PatternBuilder) -> PatternBuilder) -> Pattern {
    f(PatternBuilder::new()).build().unwrap()
}

fn whereabouts() -> Pattern {
    pattern(|p| p.word(["I", "we"]).word(["am", "are"]).word(["at", "in"]).wildcard())
}

#[rstest]
#[case("I am at Sumy", "Sumy")]
#[case("Today We are in Sumy", "Sumy")]
#[case("we are at Kyiv now", "Kyiv now")]
#[case("well, I am in the old town!", "the old town !")]
fn whereabouts_examples(#[case] text: &str, #[case] place: &str) {
    let result = run(&whereabouts(), text);
    assert!(result.matched, "{text}");
    assert_eq!(&result[0], place);
}

#[rstest]
#[case("They are at Sumy")]
#[case("I am Sumy")]
#[case("I am at")]
#[case("")]
fn whereabouts_rejections(#[case] text: &str) {
    let result = run(&whereabouts(), text);
    assert!(!result.matched, "{text}");
    assert!(result.extracted.is_empty());
}

#[test]
fn part_of_speech_sequence() {
    let p = pattern(|p| p.pronoun().noun().verb().noun());

    assert!(run(&p, "My dog ate chocolate").matched);
    assert!(!run(&p, "Neighbour's dog ate my cat").matched);
}

#[test]
fn part_of_speech_then_wildcard() {
    let p = pattern(|p| p.pronoun().verb().wildcard());
    assert_eq!(run(&p, "I like green apples").extracted, vec!["green apples".to_string()]);
}

#[test]
fn wildcard_stops_where_next_element_starts() {
    let p = pattern(|p| p.word(["fly"]).word(["to"]).wildcard().word(["tomorrow", "today"]));

    let result = run(&p, "We fly to New York tomorrow");
    assert!(result.matched);
    assert_eq!(result.extracted, vec!["New York".to_string()]);
}

#[test]
fn wildcard_needs_at_least_one_token() {
    let p = pattern(|p| p.word(["fly"]).word(["to"]).wildcard().word(["tomorrow"]));
    assert!(!run(&p, "fly to tomorrow").matched);
}

#[test]
fn wildcard_before_disjunction_captures_one_token() {
    // A disjunction scans forward on its own, so it succeeds right after the wildcard's first token.
    let p = pattern(|p| {
        p.word(["to"])
            .wildcard()
            .disjunction(|d| d.alternative(|a| a.word(["tomorrow"])).alternative(|a| a.word(["today"])))
    });

    let result = run(&p, "fly to New York tomorrow");
    assert!(result.matched);
    assert_eq!(result.extracted, vec!["New".to_string()]);

    let plain = pattern(|p| p.word(["to"]).wildcard().word(["tomorrow", "today"]));
    assert_eq!(run(&plain, "fly to New York tomorrow").extracted, vec!["New York".to_string()]);
}

#[rstest]
#[case(PhraseOrder::Strict, "nature of", "What nature of life?", true)]
#[case(PhraseOrder::Strict, "of nature", "What nature of life?", false)]
#[case(PhraseOrder::Any, "of nature", "What nature of life?", true)]
#[case(PhraseOrder::Any, "life what", "What nature of life?", true)]
#[case(PhraseOrder::Any, "life life", "What nature of life?", false)]
#[case(PhraseOrder::Strict, "NATURE Of", "what nature of life", true)]
fn phrases(#[case] order: PhraseOrder, #[case] phrase: &str, #[case] text: &str, #[case] expected: bool) {
    let p = pattern(|p| p.phrase(phrase, order));
    assert_eq!(run(&p, text).matched, expected);
}

#[test]
fn unordered_phrase_resumes_after_furthest_word() {
    let p = pattern(|p| p.phrase("life what", PhraseOrder::Any).wildcard());

    let result = run(&p, "What nature of life is this");
    assert_eq!(result.extracted, vec!["is this".to_string()]);
}

#[test]
fn disjunction_takes_first_matching_alternative() {
    let capture_first = pattern(|p| {
        p.disjunction(|d| d.alternative(|a| a.word(["hello"]).wildcard()).alternative(|a| a.word(["hello"])))
    });
    let plain_first = pattern(|p| {
        p.disjunction(|d| d.alternative(|a| a.word(["hello"])).alternative(|a| a.word(["hello"]).wildcard()))
    });

    assert_eq!(run(&capture_first, "hello Bob").extracted, vec!["Bob".to_string()]);
    let plain = run(&plain_first, "hello Bob");
    assert!(plain.matched);
    assert!(plain.extracted.is_empty());
}

#[test]
fn disjunction_restarts_each_alternative_at_entry() {
    let p = pattern(|p| {
        p.word(["book"]).disjunction(|d| {
            d.alternative(|a| a.wildcard().word(["plane"])).alternative(|a| a.word(["a"]).wildcard())
        })
    });

    let result = run(&p, "please book a train");
    assert!(result.matched);
    assert_eq!(result.extracted, vec!["train".to_string()]);
}

#[test]
fn disjunction_without_winner_fails() {
    let p = pattern(|p| {
        p.word(["book"]).disjunction(|d| d.alternative(|a| a.word(["train"])).alternative(|a| a.word(["plane"])))
    });

    let result = run(&p, "book a bus");
    assert!(!result.matched);
    assert!(result.extracted.is_empty());
}

#[test]
fn no_backtracking_into_earlier_elements() {
    // The first alternative's trailing wildcard eats `c`; the second is never retried.
    let p = pattern(|p| {
        p.disjunction(|d| d.alternative(|a| a.word(["a"]).wildcard()).alternative(|a| a.word(["a"]))).word(["c"])
    });
    assert!(!run(&p, "a b c").matched);
}

#[test]
fn matching_is_idempotent_after_reset() {
    let p = whereabouts();
    let utterance = utterance("Today We are in Sumy");
    let advanced = utterance.cursor().advance().advance().advance();

    let first = match_pattern(&p, utterance.cursor());
    let second = match_pattern(&p, advanced);

    assert_eq!(first, second);
    assert_eq!(first, match_pattern(&p, utterance.cursor()));
}

#[test]
fn describe_lists_elements() {
    let p = pattern(|p| p.word(["hi", "Hello"]).pos(PartOfSpeech::Noun).wildcard());
    assert_eq!(p.describe(), "word(hello|hi) pos(NOUN) *");
}

#[derive(Debug, Default, Clone)]
struct Trip {
    city: String,
}

fn trip_topic() -> Topic<Trip> {
    let mut topic = Topic::new("trip");
    topic
        .rule("where")
        .pattern(|_| whereabouts_builder())
        .then(|ctx: &mut Trip, m| ctx.city = m[0].to_string())
        .output_with(|ctx: &Trip| format!("Enjoy {}!", ctx.city))
        .add()
        .unwrap();
    topic
}

fn whereabouts_builder() -> PatternBuilder {
    PatternBuilder::new().word(["i", "we"]).word(["am", "are"]).word(["at", "in"]).wildcard()
}

#[test]
fn round_trip_renders_from_updated_context() {
    let topic = trip_topic();
    let rule = &topic.rules()[0];
    let said = utterance("We are in Lviv");

    let result = rule.match_utterance(&said);
    assert!(result.matched);

    let mut context = Trip::default();
    let text = super::fire(rule, &mut context, &said, &result);

    assert_eq!(text, rule.render(&context));
    assert_eq!(text, "Enjoy Lviv!");
}

#[test]
fn round_trip_failure_produces_nothing() {
    let topic = trip_topic();
    let rule = &topic.rules()[0];

    let result = rule.match_utterance(&utterance("Lviv is lovely"));
    assert_eq!(result, MatchResult::failure());
}
