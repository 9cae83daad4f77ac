//! # Phatic Answer Builder
//!
//! File: cli/src/engine/builder.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Synthesises a reply for a list of matched topics.
//!
//! ## Algorithm
//!
//! 1. No topics: reply `"..."`.
//! 2. Draw one topic uniformly from the list (with replacement), so any matched
//!    topic may be answered, not just the first.
//! 3. Load that topic's answers. If there are none, load the unknown topic's
//!    answers instead, then draw one.
//! 4. While the answer contains `$`, replace the first `$` with a random group
//!    insert of **the answer's topic**. Then the same for `_` with single inserts.
//!    After a fallback in step 3 the answer's topic is the unknown topic, so its
//!    pools are used rather than the matched topic's. Every marker gets its own
//!    draw. Group inserts may carry `_` markers, which step 4b then fills.
//! 5. Glue punctuation back: `" ,"`, `" ."`, `" !"`, `" ?"` lose their space.
//!
//! Any storage failure, or a marker with an empty pool, abandons the answer
//! and the reply is `"..."`. So is a marker still present after
//! [`MAX_EXPANSIONS`] substitutions, which only happens when inserts keep
//! re-introducing the marker they replace.
//!
use super::marker::Marker;
use super::random::{pick, Payload};
use super::PUNCTUATION;
use crate::common::signal::CancelToken;
use crate::core::error::{is_cancelled, PhaticError, Result};
use crate::store::{Answer, Store, Topic, UNKNOWN_TOPIC};
use rand::Rng;
use tracing::{debug, warn};

/// Reply used whenever no proper answer can be produced.
pub const PLACEHOLDER_REPLY: &str = "...";

/// Extra substitutions allowed per marker kind beyond the markers the answer
/// itself carries. Only inserts that bring in new markers can use them up.
pub const MAX_EXPANSIONS: usize = 256;

/// The answer generator.
pub struct Builder<'s, S: Store + ?Sized, R: Rng> {
    store: &'s S,
    rng: R,
}

impl<'s, S: Store + ?Sized, R: Rng> Builder<'s, S, R> {
    pub fn new(store: &'s S, rng: R) -> Self {
        Self { store, rng }
    }

    /// Reply for `topics`. Never fails; degrades to [`PLACEHOLDER_REPLY`].
    ///
    /// One topic is drawn uniformly, then one of its answers (or of the unknown
    /// topic's answers if it has none). The answer's `$` markers are filled from its
    /// topic's group inserts, then its `_` markers from the single inserts.
    ///
    /// # Arguments
    ///
    /// * `cancel` - Session token, passed on to every store read.
    /// * `topics` - Topics returned by the analyser.
    ///
    /// # Returns
    ///
    /// * `String` - The punctuation-normalised reply, or `"..."` when `topics` is empty,
    ///   a store read failed, an insert pool was empty or expansion did not settle.
    pub fn make_answer(&mut self, cancel: &CancelToken, topics: &[Topic]) -> String {
        let Some(topic) = pick(topics, &mut self.rng) else {
            return PLACEHOLDER_REPLY.to_string();
        };
        debug!("Answering on topic '{}' out of {:?}", topic, topics);

        match self.generate_answer(cancel, topic) {
            Ok(answer) => normalize_answer(&answer),
            Err(e) => {
                if is_cancelled(&e) {
                    debug!("Answer generation cancelled.");
                } else {
                    warn!("Could not build an answer for '{}': {:#}", topic, e);
                }
                PLACEHOLDER_REPLY.to_string()
            }
        }
    }

    fn generate_answer(&mut self, cancel: &CancelToken, topic: &Topic) -> Result<String> {
        let mut answers = self.store.answers(Some(topic), cancel)?;
        if answers.is_empty() && !topic.is_unknown() {
            debug!("No answers for '{}', using '{}' answers", topic, UNKNOWN_TOPIC);
            answers = self.store.answers(Some(&Topic::unknown()), cancel)?;
        }
        let answer = pick(&answers, &mut self.rng)
            .cloned()
            .ok_or_else(|| PhaticError::EmptyPool {
                kind: "answers",
                topic: UNKNOWN_TOPIC.to_string(),
            })?;
        debug!("Drew answer {:?} of topic '{}'", answer.text, answer.topic);
        self.insert_words(cancel, answer)
    }

    fn insert_words(&mut self, cancel: &CancelToken, answer: Answer) -> Result<String> {
        let Answer { text, topic } = answer;
        let store = self.store;

        let text = self.expand(text, Marker::Phrase, &topic, "group inserts", || {
            store.group_inserts(Some(&topic), cancel)
        })?;
        self.expand(text, Marker::Word, &topic, "single inserts", || {
            store.single_inserts(Some(&topic), cancel)
        })
    }

    /// Replaces every `marker` in `text`, one random draw per occurrence.
    ///
    /// The pool is fetched on first need only.
    fn expand<T: Payload>(
        &mut self,
        mut text: String,
        marker: Marker,
        topic: &Topic,
        kind: &'static str,
        fetch: impl FnOnce() -> Result<Vec<T>>,
    ) -> Result<String> {
        let symbol = marker.symbol();
        if !text.contains(symbol) {
            return Ok(text);
        }
        let pool = fetch()?;
        let budget = text.matches(symbol).count() + MAX_EXPANSIONS;
        for _ in 0..budget {
            let insert = pick(&pool, &mut self.rng).ok_or_else(|| PhaticError::EmptyPool {
                kind,
                topic: topic.to_string(),
            })?;
            text = text.replacen(symbol, insert.payload(), 1);
            if !text.contains(symbol) {
                return Ok(text);
            }
        }
        Err(PhaticError::ExpansionLimit {
            marker: symbol,
            limit: MAX_EXPANSIONS,
        }
        .into())
    }
}

/// Removes the space in front of `, . ! ?`.
///
/// # Arguments
///
/// * `answer` - A fully expanded answer.
///
/// # Returns
///
/// * `String` - `answer` with each `" ,"`, `" ."`, `" !"` and `" ?"` glued to the
///   preceding text, one replace pass per mark.
pub fn normalize_answer(answer: &str) -> String {
    let mut normalized = answer.to_string();
    for mark in PUNCTUATION {
        normalized = normalized.replace(&format!(" {}", mark), &mark.to_string());
    }
    normalized
}
