use std::cell::RefCell;
use std::path::PathBuf;

use clap::Parser;
use command_match_core::Group;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod report;

use config::GrammarConfig;
use report::{CheckEntry, NearMiss, Outcome};

/// Exit status when no command matched the tokens.
const EXIT_NO_MATCH: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "cmatch", version)]
#[command(about = "Match a token list against a YAML command grammar")]
struct Cli {
    /// Grammar file (YAML).
    #[arg(long, short)]
    grammar: PathBuf,
    /// Run only the first matching command.
    #[arg(long, conflicts_with = "check")]
    first: bool,
    /// Report how far each command matched without running anything.
    #[arg(long)]
    check: bool,
    /// Print the usage of every command and exit.
    #[arg(long, conflicts_with_all = ["first", "check"])]
    usage: bool,
    /// Log filter used when RUST_LOG is unset (e.g. debug, command_match_core=trace).
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Tokens to match.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(&cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<i32, String> {
    let config = GrammarConfig::load(&cli.grammar)
        .map_err(|e| format!("failed to load grammar '{}': {e}", cli.grammar.display()))?;
    let sink = RefCell::new(Vec::new());
    let mut group = config.build_group(&sink).map_err(|e| e.to_string())?;
    info!(
        grammar = %cli.grammar.display(),
        commands = group.len(),
        "Grammar loaded"
    );

    if cli.usage {
        println!("{group}");
        return Ok(0);
    }
    if cli.check {
        return run_check(&config, &group, &cli.tokens);
    }

    let matched = if cli.first {
        usize::from(group.execute_first(&cli.tokens).is_some())
    } else {
        group.execute_all(&cli.tokens)
    };
    debug!(matched, tokens = cli.tokens.len(), "Dispatch finished");

    let closest = if matched == 0 {
        near_miss(&config, &group, &cli.tokens)
    } else {
        None
    };
    print_json(&Outcome {
        tokens: cli.tokens.clone(),
        matches: sink.take(),
        closest,
    })?;

    Ok(if matched == 0 { EXIT_NO_MATCH } else { 0 })
}

fn run_check(config: &GrammarConfig, group: &Group<'_>, tokens: &[String]) -> Result<i32, String> {
    let entries: Vec<CheckEntry> = config
        .commands
        .iter()
        .zip(group.commands())
        .enumerate()
        .map(|(index, (entry, command))| CheckEntry::new(index, &entry.name, command.check(tokens)))
        .collect();
    print_json(&entries)?;

    if entries.iter().any(|e| e.matched) {
        Ok(0)
    } else {
        Ok(EXIT_NO_MATCH)
    }
}

fn near_miss(config: &GrammarConfig, group: &Group<'_>, tokens: &[String]) -> Option<NearMiss> {
    let (index, consumed) = group.closest(tokens)?;
    let error = group.command(index)?.check(tokens).err()?.error.to_string();
    Some(NearMiss {
        index,
        command: config.commands[index].name.clone(),
        consumed,
        error,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}
