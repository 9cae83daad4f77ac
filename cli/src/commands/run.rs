//! # Run Command (`phatic run`)
//!
//! File: cli/src/commands/run.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The interactive dialogue. Prints the greeting, then reads one sentence per
//! line and prints one reply per sentence until:
//! - the user types a quit command (the farewell is printed),
//! - input ends (Ctrl+D or a closed pipe),
//! - or Ctrl+C cancels the session.
//!
//! ## Examples
//!
//! ```bash
//! phatic run
//! echo "привіт" | phatic run --rng-seed 42
//! ```
//!
use crate::commands::options::{self, EngineArgs, StoreArgs};
use crate::commands::session::Session;
use crate::common::signal::{self, CancelToken};
use crate::core::config::{self, DialogueConfig};
use crate::core::error::Result;
use crate::store::Store;
use anyhow::Context;
use clap::Parser;
use rand::Rng;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    store: StoreArgs,
    #[command(flatten)]
    engine: EngineArgs,
}

pub async fn handle_run(args: RunArgs) -> Result<()> {
    info!("Handling run command...");
    let config = config::load_config()?;
    let store = options::open_dialogue_store(&args.store, &config)?;

    let cancel = CancelToken::new();
    signal::on_interrupt(cancel.clone());

    let mut session = Session::new(&store, &config.matcher, args.engine.rng());
    let input = BufReader::new(tokio::io::stdin());
    run_dialogue(&mut session, &config.dialogue, &cancel, input, std::io::stdout()).await
}

/// Drives one dialogue from `input` to `out`.
pub async fn run_dialogue<S, R, I, W>(
    session: &mut Session<'_, S, R>,
    dialogue: &DialogueConfig,
    cancel: &CancelToken,
    input: I,
    mut out: W,
) -> Result<()>
where
    S: Store + ?Sized,
    R: Rng,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", dialogue.greeting)?;
    let mut lines = input.lines();

    loop {
        if cancel.is_cancelled() {
            info!("Dialogue cancelled.");
            break;
        }
        write!(out, "{}", dialogue.user_prompt)?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = cancel.cancelled() => {
                info!("Dialogue cancelled while waiting for input.");
                writeln!(out)?;
                break;
            }
        };
        let Some(line) = line else {
            debug!("Input closed, ending dialogue.");
            writeln!(out)?;
            break;
        };

        let sentence = line.trim_end_matches('\r');
        if dialogue.quit_commands.iter().any(|quit| quit == sentence) {
            writeln!(out, "{}", dialogue.farewell)?;
            break;
        }

        let reply = session.respond(cancel, sentence);
        writeln!(out, "{} {}", dialogue.bot_prompt, reply.text)?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MatcherConfig;
    use crate::store::memory::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .template("привіт", "привітання")
            .answer("привіт , _ !", "привітання")
            .single("друже", "привітання")
            .answer("хммм...", "unknown_topic")
    }

    async fn dialogue(store: &MemoryStore, cancel: &CancelToken, input: &str) -> String {
        let mut session = Session::new(store, &MatcherConfig::default(), StdRng::seed_from_u64(5));
        let mut out = Vec::new();
        run_dialogue(
            &mut session,
            &DialogueConfig::default(),
            cancel,
            input.as_bytes(),
            &mut out,
        )
        .await
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_dialogue_until_quit() {
        let store = store();
        let out = dialogue(&store, &CancelToken::new(), "Привіт!\nщо нового?\nquit\nпривіт\n").await;

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "WELCOME TO PHATIC-DIALOGUE PROGRAM");
        assert_eq!(lines[1], "you>> ms.X>>  привіт, друже!");
        assert_eq!(lines[2], "you>> ms.X>>  хммм...");
        assert_eq!(lines[3], "you>> BYE-BYE");
        assert_eq!(lines.len(), 4);
    }

    #[tokio::test]
    async fn test_dialogue_ends_at_end_of_input() {
        let store = store();
        let out = dialogue(&store, &CancelToken::new(), "привіт\r\n").await;

        assert!(out.contains("ms.X>>  привіт, друже!"));
        assert!(!out.contains("BYE-BYE"));
        assert!(out.ends_with("you>> \n"));
    }

    #[tokio::test]
    async fn test_quit_commands_match_exactly() {
        let store = store();
        let out = dialogue(&store, &CancelToken::new(), "quit now\n/q\n").await;

        assert!(out.contains("ms.X>>  хммм..."));
        assert!(out.contains("BYE-BYE"));
    }

    #[tokio::test]
    async fn test_cancelled_dialogue_stops() {
        let store = store();
        let cancel = CancelToken::new();
        cancel.cancel();
        let out = dialogue(&store, &cancel, "привіт\n").await;

        assert_eq!(out, "WELCOME TO PHATIC-DIALOGUE PROGRAM\n");
    }
}
