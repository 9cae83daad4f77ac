//! # Phatic Dialogue Store
//!
//! File: cli/src/store/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Domain types for the dialogue data and the read interface the engine needs.
//!
//! Every entity hangs off a [`Topic`]:
//! - [`Template`]: an input pattern. `_` stands for one word, `$` for any number of words.
//! - [`Answer`]: a reply template using the same two markers.
//! - [`SingleInsert`]: a word that can replace `_` in an answer.
//! - [`GroupInsert`]: a phrase that can replace `$` in an answer.
//!
//! ## Architecture
//!
//! - The [`Store`] trait holds the four reads the engine performs. Each takes the
//!   session's `CancelToken` and fails with `PhaticError::Cancelled` once it trips.
//! - `sqlite`: the SQLite implementation, which also owns schema creation and the
//!   create operations used by `phatic seed`.
//!
//! Data is written once by seeding and only read afterwards.
//!
use crate::common::signal::CancelToken;
use crate::core::error::Result;
use std::fmt;

pub mod sqlite;

#[cfg(test)]
pub mod memory;

pub use sqlite::SqliteStore;

/// Name of the topic used when nothing matched or a topic has no answers.
pub const UNKNOWN_TOPIC: &str = "unknown_topic";

/// Classification bucket linking templates, answers and insert pools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The sentinel topic.
    pub fn unknown() -> Self {
        Self(UNKNOWN_TOPIC.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_TOPIC
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Input-matching pattern owned by a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub pattern: String,
    pub topic: Topic,
}

/// Reply template owned by a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub topic: Topic,
}

/// One-word filler for the `_` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleInsert {
    pub word: String,
    pub topic: Topic,
}

/// Phrase filler for the `$` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInsert {
    pub words: String,
    pub topic: Topic,
}

/// Read access to the dialogue data.
///
/// `None` as topic filter lists every row. The engine always filters.
pub trait Store {
    /// Every template, ordered by topic ascending.
    fn templates(&self, cancel: &CancelToken) -> Result<Vec<Template>>;

    fn answers(&self, topic: Option<&Topic>, cancel: &CancelToken) -> Result<Vec<Answer>>;

    fn single_inserts(&self, topic: Option<&Topic>, cancel: &CancelToken)
        -> Result<Vec<SingleInsert>>;

    fn group_inserts(&self, topic: Option<&Topic>, cancel: &CancelToken)
        -> Result<Vec<GroupInsert>>;
}
