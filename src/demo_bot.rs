//! A small travel-planning bot used by the CLI.
//!
//! ```text
//! hello ──> "What's your name?"
//!             └─ rejoinders: "I'm Ada" | "my name is Ada" | "Ada"
//! fly to Lisbon ──> "When would you like to go?"
//!             └─ rejoinders: a date ("next friday", "2026-11-03") | anything else
//! ```

use chrono::{Local, NaiveDate};
use chrono_english::{Dialect, parse_date_string};
use fluency::{Bot, BuildError, MatchResult, PhraseOrder, Topic, Utterance};

const PARTY_SIZE: &str = r"(?i)\b(\d+)\s+(?:people|persons|adults|travell?ers|tickets)\b";

#[derive(Debug, Clone, Default)]
pub struct TravelContext {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    pub travellers: Option<u32>,
}

pub struct TravelBot {
    topic: Topic<TravelContext>,
}

impl TravelBot {
    pub fn new() -> Result<Self, BuildError> {
        let mut topic: Topic<TravelContext> = Topic::new("travel");

        topic
            .rule("greet")
            .pattern(|p| p.word(["hi", "hello", "hey"]))
            .output("Hello! I can help you plan a trip. What's your name?")
            .with_test("hello there", "Hello! I can help you plan a trip. What's your name?")
            .rejoinder(|t| {
                t.rule("introduction")
                    .pattern(|p| {
                        p.disjunction(|d| {
                            d.alternative(|a| a.word(["i'm", "im"]).wildcard())
                                .alternative(|a| a.phrase("my name is", PhraseOrder::Strict).wildcard())
                                .alternative(|a| a.phrase("call me", PhraseOrder::Strict).wildcard())
                        })
                    })
                    .then(remember_name)
                    .output_with(welcome)
                    .with_test("I'm Ada", "Nice to meet you, Ada. Where would you like to travel?")
                    .with_test(
                        "my name is Ada Lovelace",
                        "Nice to meet you, Ada Lovelace. Where would you like to travel?",
                    )
                    .add()?;
                t.rule("bare-name")
                    .pattern(|p| p.wildcard())
                    .then(remember_name)
                    .output_with(welcome)
                    .with_test("Ada", "Nice to meet you, Ada. Where would you like to travel?")
                    .add()
            })
            .add()?;

        topic
            .rule("destination")
            .keep(true)
            .repeat(true)
            .pattern(|p| {
                p.disjunction(|d| {
                    d.alternative(|a| {
                        a.word(["fly", "flying", "go", "going", "travel", "travelling", "get", "trip"])
                            .word(["to"])
                            .wildcard()
                    })
                    .alternative(|a| a.word(["visit", "visiting", "see"]).wildcard())
                })
            })
            .then(|ctx: &mut TravelContext, m| {
                ctx.destination = m.get(0).map(clean);
                ctx.date = None;
            })
            .output_with(|ctx: &TravelContext| {
                format!("{}, good choice! When would you like to go?", ctx.destination.as_deref().unwrap_or("There"))
            })
            .with_test("I want to fly to Lisbon.", "Lisbon, good choice! When would you like to go?")
            .with_test("we would like to visit Kyiv", "Kyiv, good choice! When would you like to go?")
            .rejoinder(|t| {
                t.rule("travel-date").when(mentions_date).does(remember_date).output_with(confirm).add()?;
                t.rule("unclear-date")
                    .output("Sorry, I did not get the date. Try \"next friday\" or \"2026-11-03\".")
                    .add()
            })
            .add()?;

        topic
            .rule("late-date")
            .keep(true)
            .repeat(true)
            .when(|ctx: &TravelContext, _| ctx.destination.is_some() && ctx.date.is_none())
            .when(mentions_date)
            .does(remember_date)
            .output_with(confirm)
            .add()?;

        topic
            .rule("travellers")
            .keep(true)
            .repeat(true)
            .when_regex_then(PARTY_SIZE, |ctx: &mut TravelContext, caps| ctx.travellers = caps[1].parse().ok())
            .output_with(|ctx: &TravelContext| match ctx.travellers {
                Some(1) => "Noted, travelling alone.".to_string(),
                Some(n) => format!("Noted, {n} travellers."),
                None => "How many of you are travelling?".to_string(),
            })
            .with_test("we are 3 people", "Noted, 3 travellers.")
            .add()?;

        topic
            .rule("whoami")
            .keep(true)
            .repeat(true)
            .pattern(|p| p.phrase("what is my name", PhraseOrder::Strict))
            .output_with(|ctx: &TravelContext| match &ctx.name {
                Some(name) => format!("You are {name}."),
                None => "You have not told me yet.".to_string(),
            })
            .with_test("so what is my name?", "You have not told me yet.")
            .add()?;

        topic
            .rule("weather")
            .keep(true)
            .repeat(true)
            .when_regex(r"(?i)\b(weather|rain|sunny)\b")
            .output("I only do travel, but packing an umbrella never hurts.")
            .with_test("will it rain?", "I only do travel, but packing an umbrella never hurts.")
            .add()?;

        topic
            .rule("thanks")
            .keep(true)
            .repeat(true)
            .pattern(|p| p.word(["thanks", "thank"]))
            .output("You're welcome!")
            .add()?;

        topic
            .rule("goodbye")
            .pattern(|p| p.word(["bye", "goodbye"]))
            .output_with(farewell)
            .with_test("bye", "Goodbye, traveller!")
            .add()?;

        Ok(TravelBot { topic })
    }
}

impl Bot for TravelBot {
    type Context = TravelContext;

    fn topic(&self) -> &Topic<TravelContext> {
        &self.topic
    }
}

fn clean(text: &str) -> String {
    text.trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace()).to_string()
}

fn remember_name(ctx: &mut TravelContext, m: &MatchResult) {
    ctx.name = m.get(0).map(clean);
}

fn welcome(ctx: &TravelContext) -> String {
    format!("Nice to meet you, {}. Where would you like to travel?", ctx.name.as_deref().unwrap_or("traveller"))
}

fn mentions_date(_: &TravelContext, utterance: &Utterance) -> bool {
    parse_when(utterance.raw()).is_some()
}

fn remember_date(utterance: &Utterance, ctx: &mut TravelContext) {
    ctx.date = parse_when(utterance.raw());
}

fn confirm(ctx: &TravelContext) -> String {
    let destination = ctx.destination.as_deref().unwrap_or("your destination");
    match ctx.date {
        Some(date) => format!("Done: {destination} on {}.", date.format("%A, %-d %B %Y")),
        None => format!("When would you like to go to {destination}?"),
    }
}

fn farewell(ctx: &TravelContext) -> String {
    let name = ctx.name.as_deref().unwrap_or("traveller");
    match (&ctx.destination, ctx.date) {
        (Some(destination), Some(date)) => {
            format!("Goodbye, {name}! Enjoy {destination} on {}.", date.format("%-d %B"))
        }
        (Some(destination), None) => format!("Goodbye, {name}! Enjoy {destination}."),
        _ => format!("Goodbye, {name}!"),
    }
}

/// Parse a free-form date ("tomorrow", "next friday", "2026-11-03").
fn parse_when(text: &str) -> Option<NaiveDate> {
    let cleaned = clean(text.trim()).to_lowercase();
    let cleaned = cleaned.strip_prefix("on ").unwrap_or(&cleaned);
    parse_date_string(cleaned, Local::now(), Dialect::Uk).ok().map(|at| at.date_naive())
}
