//! # Ask Command (`phatic ask`)
//!
//! File: cli/src/commands/ask.rs
//! Author: Christi Mahu
//!
//! Answers a single sentence given on the command line and exits. With
//! `--topics` the matched topics are printed on the line before the reply.
//!
//! ```bash
//! phatic ask добрий ранок
//! phatic ask --topics "яка погода буде завтра?"
//! ```
//!
use crate::commands::options::{self, EngineArgs, StoreArgs};
use crate::commands::session::Session;
use crate::common::signal::CancelToken;
use crate::core::config;
use crate::core::error::Result;
use crate::store::Topic;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Words of the sentence to answer.
    #[arg(required = true, num_args = 1.., value_name = "WORDS")]
    words: Vec<String>,
    /// Also print the topics the sentence matched.
    #[arg(long)]
    topics: bool,
    #[command(flatten)]
    store: StoreArgs,
    #[command(flatten)]
    engine: EngineArgs,
}

pub async fn handle_ask(args: AskArgs) -> Result<()> {
    info!("Handling ask command...");
    let config = config::load_config()?;
    let store = options::open_dialogue_store(&args.store, &config)?;
    let mut session = Session::new(&store, &config.matcher, args.engine.rng());

    let sentence = args.words.join(" ");
    let reply = session.respond(&CancelToken::new(), &sentence);
    if args.topics {
        println!("topics: {}", format_topics(&reply.topics));
    }
    println!("{}", reply.text);
    Ok(())
}

fn format_topics(topics: &[Topic]) -> String {
    topics.iter().map(Topic::as_str).collect::<Vec<_>>().join(", ")
}
