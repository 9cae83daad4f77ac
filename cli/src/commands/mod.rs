//! # Phatic Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The subcommands of the `phatic` CLI. Each module defines its argument struct
//! and an async `handle_*` function that `main.rs` dispatches to.
//!
//! - `run`: the interactive dialogue
//! - `ask`: answer one sentence and exit
//! - `seed`: create and fill the dialogue database
//!
//! `options` and `session` hold what those commands share.
//!

/// Answer a single sentence given as arguments.
pub mod ask;
/// Argument groups shared between subcommands.
pub mod options;
/// Interactive dialogue loop.
pub mod run;
/// Database creation and seeding.
pub mod seed;
/// Analyser and builder paired over one store.
pub mod session;
