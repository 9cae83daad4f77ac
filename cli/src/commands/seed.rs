//! # Seed Command (`phatic seed`)
//!
//! File: cli/src/commands/seed.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Creates the dialogue tables and fills them from a TOML seed file. Without
//! `--data` the bundled `seed/default.toml` is used.
//!
//! A seed file is a list of `[[topic]]` tables:
//!
//! ```toml
//! [[topic]]
//! name = "привітання"
//! templates = ["привіт", "вітаю"]
//! answers = ["привіт , _ !"]
//! single_inserts = ["друже"]
//! group_inserts = [", чим я можу вам допомогти ?"]
//! ```
//!
//! Everything is written in one transaction. Seeding a database that already holds
//! the same topics fails unless `--reset` drops the existing tables first.
//!
use crate::commands::options::StoreArgs;
use crate::common::fs::io;
use crate::core::config;
use crate::core::error::{PhaticError, Result};
use crate::store::{Answer, GroupInsert, SingleInsert, SqliteStore, Template, Topic, UNKNOWN_TOPIC};
use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

const DEFAULT_SEED: &str = include_str!("../../seed/default.toml");

#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    store: StoreArgs,
    /// TOML seed file to load instead of the bundled data.
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,
    /// Drop existing dialogue tables before seeding.
    #[arg(long)]
    reset: bool,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct SeedData {
    #[serde(rename = "topic", default)]
    pub topics: Vec<TopicSeed>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct TopicSeed {
    pub name: String,
    #[serde(default)]
    pub templates: Vec<String>,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub single_inserts: Vec<String>,
    #[serde(default)]
    pub group_inserts: Vec<String>,
}

/// Row counts written by one seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub topics: usize,
    pub templates: usize,
    pub answers: usize,
    pub single_inserts: usize,
    pub group_inserts: usize,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} topics, {} templates, {} answers, {} single inserts, {} group inserts",
            self.topics, self.templates, self.answers, self.single_inserts, self.group_inserts
        )
    }
}

pub async fn handle_seed(args: SeedArgs) -> Result<()> {
    info!("Handling seed command...");
    let config = config::load_config()?;
    let path = args.store.database_path(&config);

    let data = match &args.data {
        Some(file) => {
            info!("Loading seed data from {}", file.display());
            let text = io::read_file_to_string(file)?;
            parse_seed(&text).with_context(|| format!("Invalid seed file {}", file.display()))?
        }
        None => {
            debug!("Using bundled seed data.");
            parse_seed(DEFAULT_SEED).context("Invalid bundled seed data")?
        }
    };

    let store = SqliteStore::open(&path)?;
    if args.reset {
        store.drop_schema()?;
    }
    store.create_schema()?;
    let summary = seed_store(&store, &data).with_context(|| {
        format!(
            "Failed to seed '{}' (use --reset to replace existing data)",
            path.display()
        )
    })?;

    println!("Seeded {} with {}.", path.display(), summary);
    Ok(())
}

/// Parses and checks seed data.
pub fn parse_seed(text: &str) -> Result<SeedData> {
    let data: SeedData = toml::from_str(text)
        .map_err(|e| PhaticError::SeedData(format!("Failed to parse seed data: {}", e)))?;
    validate_seed(&data)?;
    Ok(data)
}

fn validate_seed(data: &SeedData) -> Result<()> {
    let mut seen = HashSet::new();
    for topic in &data.topics {
        let name = topic.name.trim().to_lowercase();
        if name.is_empty() {
            return Err(anyhow!(PhaticError::SeedData(
                "Topic names must not be empty".to_string()
            )));
        }
        if !seen.insert(name) {
            return Err(anyhow!(PhaticError::SeedData(format!(
                "Topic '{}' is listed more than once",
                topic.name
            ))));
        }
    }
    if !seen.contains(UNKNOWN_TOPIC) {
        warn!(
            "Seed data has no '{}' topic; unmatched sentences will get '...' as reply.",
            UNKNOWN_TOPIC
        );
    }
    Ok(())
}

/// Writes `data` into `store` in a single transaction.
pub fn seed_store(store: &SqliteStore, data: &SeedData) -> Result<SeedSummary> {
    store.in_transaction(|store| {
        let mut summary = SeedSummary::default();
        for seed in &data.topics {
            let topic = store.create_topic(&Topic::new(seed.name.trim()))?;
            summary.topics += 1;
            for pattern in &seed.templates {
                store.create_template(&Template {
                    pattern: pattern.clone(),
                    topic: topic.clone(),
                })?;
            }
            for text in &seed.answers {
                store.create_answer(&Answer {
                    text: text.clone(),
                    topic: topic.clone(),
                })?;
            }
            for word in &seed.single_inserts {
                store.create_single_insert(&SingleInsert {
                    word: word.clone(),
                    topic: topic.clone(),
                })?;
            }
            for words in &seed.group_inserts {
                store.create_group_insert(&GroupInsert {
                    words: words.clone(),
                    topic: topic.clone(),
                })?;
            }
            summary.templates += seed.templates.len();
            summary.answers += seed.answers.len();
            summary.single_inserts += seed.single_inserts.len();
            summary.group_inserts += seed.group_inserts.len();
            debug!("Seeded topic '{}'", topic);
        }
        info!("Seeded {}", summary);
        Ok(summary)
    })
}
