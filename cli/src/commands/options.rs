//! # Shared Command Options
//!
//! File: cli/src/commands/options.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Argument groups flattened into several subcommands:
//! - `StoreArgs` (`--db`): which SQLite database to use.
//! - `EngineArgs` (`--rng-seed`): how the random source is seeded.
//!
//! Plus `open_dialogue_store`, which opens an already seeded database for the
//! commands that only read from it (`run`, `ask`).
//!
use crate::core::config::Config;
use crate::core::error::{PhaticError, Result};
use crate::store::SqliteStore;
use anyhow::{anyhow, Context};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// SQLite database to use instead of the configured `database.path`.
    #[arg(long, env = "PHATIC_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,
}

impl StoreArgs {
    pub fn database_path(&self, config: &Config) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.database.path))
    }
}

#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Seed for the random source, making replies reproducible.
    #[arg(long, env = "PHATIC_RNG_SEED", value_name = "N")]
    pub rng_seed: Option<u64>,
}

impl EngineArgs {
    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => {
                debug!("Seeding random source with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }
}

/// Opens the database for reading, requiring it to be seeded already.
pub fn open_dialogue_store(args: &StoreArgs, config: &Config) -> Result<SqliteStore> {
    let path = args.database_path(config);
    if !path.is_file() {
        return Err(anyhow!(PhaticError::Config(format!(
            "Database '{}' does not exist. Run `phatic seed` first.",
            path.display()
        ))));
    }
    let store = SqliteStore::open(&path)?;
    let topics = store.topics().with_context(|| {
        format!(
            "Database '{}' holds no dialogue data. Run `phatic seed` first",
            path.display()
        )
    })?;
    debug!("Dialogue database has {} topics", topics.len());
    Ok(store)
}
