use fluency::{CandidateSource, Reply, RuleTestOutcome, TurnDetails};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Verbose trace of one turn, written to stderr so replies stay on stdout.
pub fn print_turn(input: &str, reply: &Reply, details: &TurnDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    eprintln!("\n{}", palette.bold(palette.paint(format!("⚙  Turn: \"{}\"", input), ansi::CYAN)));

    eprintln!("\n{}", palette.paint("━━━ Tokens ━━━", ansi::GRAY));
    if details.tokens.is_empty() {
        eprintln!("{}", palette.dim("  No tokens"));
    }
    for (idx, token) in details.tokens.iter().enumerate() {
        eprintln!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(&token.text),
            palette.paint(token.pos.tag(), ansi::BLUE),
            palette.dim(&token.lemma),
        );
    }

    eprintln!("\n{}", palette.paint("━━━ Selection ━━━", ansi::GRAY));
    match (&reply.rule, &details.path) {
        (Some(rule), Some(path)) => {
            let source = match details.source {
                Some(CandidateSource::Rejoinders) => "rejoinders",
                _ => "top level",
            };
            eprintln!(
                "  {} {} {} {}",
                palette.paint("✓", ansi::GREEN),
                palette.bold(palette.paint(rule, ansi::GREEN)),
                palette.dim(format!("path {path} │ from")),
                palette.paint(source, ansi::CYAN),
            );
            for (idx, value) in reply.extracted.iter().enumerate() {
                eprintln!("    {} {}", palette.paint(format!("${}", idx), ansi::YELLOW), value);
            }
        }
        _ => {
            eprintln!("  {}", palette.dim("✗ no eligible rule"));
            eprintln!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
            eprintln!("  • Conditions rejected the input");
            eprintln!("  • Patterns did not match the tokens above");
            eprintln!("  • Matching rules already fired and do not repeat");
        }
    }
    if details.metrics.fell_back {
        eprintln!("  {}", palette.paint("↩ no rejoinder was eligible, fell back to top level", ansi::YELLOW));
    }
    eprintln!(
        "  {} {}  {} {}",
        palette.dim("rules evaluated:"),
        palette.paint(details.metrics.rules_evaluated.to_string(), ansi::YELLOW),
        palette.dim("patterns run:"),
        palette.paint(details.metrics.patterns_run.to_string(), ansi::YELLOW),
    );

    eprintln!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    eprintln!(
        "  Total: {}  │  Tokenize: {}  │  Selection: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.tokenize), ansi::CYAN),
        palette.dim(format!("{:?}", details.metrics.selection)),
    );
    eprintln!();
}

/// Report of `--check`. Returns the number of failed examples.
pub fn print_check(outcomes: &[RuleTestOutcome], color: bool) -> usize {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.paint("━━━ Rule examples ━━━", ansi::GRAY));

    for outcome in outcomes {
        let mark = if outcome.passed { palette.paint("✓", ansi::GREEN) } else { palette.paint("✗", ansi::RED) };
        println!(
            "  {} {} {} {}",
            mark,
            palette.paint(format!("{:<6}", outcome.path.to_string()), ansi::GRAY),
            palette.paint(&outcome.rule, ansi::BLUE),
            palette.dim(format!("\"{}\"", outcome.input)),
        );
        if !outcome.passed {
            println!("      {} {}", palette.dim("expected:"), palette.paint(&outcome.expected, ansi::GREEN));
            let actual = outcome.actual.as_deref().unwrap_or("(rule not eligible)");
            println!("      {} {}", palette.dim("actual:  "), palette.paint(actual, ansi::RED));
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed).count();
    let summary = format!("{} passed, {} failed", outcomes.len() - failed, failed);
    let summary_color = if failed == 0 { ansi::GREEN } else { ansi::RED };
    println!("\n  {}\n", palette.bold(palette.paint(summary, summary_color)));
    failed
}
