//! # Phatic Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout the Phatic application.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `PhaticError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration errors
//! - Storage errors (SQLite, missing topics, cancelled calls)
//! - Answer generation errors (empty pools, runaway expansion)
//! - Seed data errors
//!
//! The dialogue engine never lets these reach the user. The matcher degrades to
//! the unknown topic and the answer builder degrades to the placeholder reply.
//! Only the `seed`/`ask`/`run` command plumbing propagates them to `main`.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !store.has_topic(&topic)? {
//!     anyhow::bail!(PhaticError::TopicNotFound { topic: topic.to_string() });
//! }
//!
//! // Pattern matching on error types
//! match result {
//!     Err(e) if e.downcast_ref::<PhaticError>().map_or(false, |pe| matches!(pe, PhaticError::Cancelled)) => {
//!         println!("Interrupted.");
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the Phatic application.
#[derive(Error, Debug)]
pub enum PhaticError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: rusqlite::Error,
    },

    #[error("Operation cancelled.")]
    Cancelled,

    #[error("Topic '{topic}' does not exist.")]
    TopicNotFound { topic: String },

    #[error("No {kind} available for topic '{topic}'.")]
    EmptyPool { kind: &'static str, topic: String },

    #[error("Placeholder '{marker}' still unresolved after {limit} substitutions.")]
    ExpansionLimit { marker: char, limit: usize },

    #[error("Seed data error: {0}")]
    SeedData(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

/// Returns `true` if `err` wraps [`PhaticError::Cancelled`].
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PhaticError>(),
        Some(PhaticError::Cancelled)
    )
}
