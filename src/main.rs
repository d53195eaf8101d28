mod debug_report;
mod demo_bot;

use demo_bot::{TravelBot, TravelContext};
use fluency::{Bot, ChatEngine, InMemoryConversationStore, LexiconTokenizer, Options, verify_rules};
use std::io::{self, BufRead, IsTerminal, Write};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    init_tracing(config.verbose);

    let bot = match TravelBot::new() {
        Ok(bot) => bot,
        Err(err) => {
            eprintln!("error: failed to build the travel bot: {err}");
            std::process::exit(1);
        }
    };

    let code = if config.check { run_check(&bot, &config) } else { run_chat(&bot, config) };
    std::process::exit(code);
}

struct CliConfig {
    user: Option<String>,
    verbose: bool,
    check: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut user: Option<String> = None;
    let mut verbose = false;
    let mut check = false;
    let mut color = io::stderr().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("fluency {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--verbose" | "-v" => verbose = true,
            "--check" => check = true,
            "--user" | "-u" => {
                let value = args.next().ok_or_else(|| "error: --user expects a value".to_string())?;
                user = Some(parse_user(&value)?);
            }
            _ if arg.starts_with("--user=") => {
                user = Some(parse_user(arg.trim_start_matches("--user="))?);
            }
            _ => return Err(format!("error: unknown argument '{arg}'\n\n{}", help_text())),
        }
    }

    Ok(CliConfig { user, verbose, check, color })
}

fn parse_user(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("error: --user must not be empty".to_string());
    }
    Ok(value.to_string())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

fn run_check(bot: &TravelBot, config: &CliConfig) -> i32 {
    match verify_rules(bot.topic(), &LexiconTokenizer::new(Options::default().language)) {
        Ok(outcomes) => {
            let failed = debug_report::print_check(&outcomes, config.color);
            if failed == 0 { 0 } else { 1 }
        }
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn run_chat(bot: &TravelBot, config: CliConfig) -> i32 {
    let engine: ChatEngine<_, InMemoryConversationStore<TravelContext>> =
        ChatEngine::with_options(&Options::default(), InMemoryConversationStore::new());
    let interactive = io::stdin().is_terminal();
    let mut lines = io::stdin().lock().lines();

    let user = match config.user {
        Some(user) => user,
        None => {
            println!("What is your name?");
            match lines.next() {
                Some(Ok(line)) if !line.trim().is_empty() => line.trim().to_string(),
                Some(Err(err)) => {
                    eprintln!("error: failed to read stdin: {err}");
                    return 1;
                }
                _ => "guest".to_string(),
            }
        }
    };

    loop {
        if interactive {
            print!("> ");
            let _ = io::stdout().flush();
        }
        let input = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                eprintln!("error: failed to read stdin: {err}");
                return 1;
            }
            None => return 0,
        };
        if input.trim().is_empty() {
            continue;
        }

        let turn = if config.verbose {
            engine.perform_verbose(bot, &input, &user).map(|(reply, details)| {
                debug_report::print_turn(&input, &reply, &details, config.color);
                reply
            })
        } else {
            engine.perform(bot, &input, &user)
        };

        match turn {
            Ok(reply) => println!("{}", reply.text),
            Err(err) => {
                eprintln!("error: {err}");
                return 1;
            }
        }
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "fluency {version}

Rule-based dialogue engine CLI, running the demo travel bot.

Usage:
  fluency [OPTIONS]

Reads one utterance per line from stdin and prints the bot's reply.

Options:
  -u, --user <id>            Conversation id. If omitted, the first line of
                             input is taken as your name.
  -v, --verbose              Print a per-turn trace to stderr and raise the
                             default log level to debug.
  --check                    Run every rule's example tests and exit.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  RUST_LOG                   Log filter (default: warn).

Exit codes:
  0  Success.
  1  Internal error or failing rule examples.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
