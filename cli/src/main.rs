//! # Phatic Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point of the `phatic` CLI, a rule-based small-talk responder. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - `engine`: topic matching (`Analyser`) and answer generation (`Builder`)
//! - `store`: the dialogue data and its SQLite backing
//! - `commands`: `run`, `ask` and `seed`
//! - `core` / `common`: configuration, errors, filesystem and cancellation helpers
//!
//! ## Examples
//!
//! ```bash
//! # Create the database from the bundled data
//! phatic seed
//!
//! # Talk
//! phatic run
//!
//! # One-off answer with debug logging
//! phatic -vv ask добрий вечір
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Subcommand handlers (run, ask, seed)
mod common; // Shared utilities (fs, signal)
mod core; // Configuration and errors
mod engine; // Topic matching and answer generation
mod store; // Dialogue data access

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "phatic",
    about = "Phatic dialogue: a rule-based small-talk responder",
    long_about = "Matches what you type against topic templates and answers with a random,\n\
                  topic-appropriate reply built from the dialogue database.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Start an interactive dialogue.
    #[command(alias = "r")]
    Run(commands::run::RunArgs),
    /// Answer a single sentence and exit.
    Ask(commands::ask::AskArgs),
    /// Create the dialogue database and fill it with seed data.
    Seed(commands::seed::SeedArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Run(args) => commands::run::handle_run(args).await,
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Seed(args) => commands::seed::handle_seed(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn phatic_cmd() -> Command {
        Command::cargo_bin("phatic").expect("Failed to find phatic binary for testing")
    }

    #[test]
    fn test_main_help_flag() {
        phatic_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("seed"));
    }

    #[test]
    fn test_main_version_flag() {
        phatic_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_missing_subcommand_fails() {
        phatic_cmd().assert().failure();
    }
}
