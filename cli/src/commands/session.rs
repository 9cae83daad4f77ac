//! # Dialogue Session
//!
//! File: cli/src/commands/session.rs
//! Author: Christi Mahu
//!
//! Pairs an `Analyser` and a `Builder` over one store, so a command can turn a
//! sentence into a reply with a single call.
//!
use crate::common::signal::CancelToken;
use crate::core::config::MatcherConfig;
use crate::engine::{Analyser, Builder, PatternCompiler};
use crate::store::{Store, Topic};
use rand::Rng;
use tracing::debug;

/// The outcome of answering one sentence.
#[derive(Debug, Clone)]
pub struct Reply {
    pub topics: Vec<Topic>,
    pub text: String,
}

pub struct Session<'s, S: Store + ?Sized, R: Rng> {
    analyser: Analyser<'s, S>,
    builder: Builder<'s, S, R>,
}

impl<'s, S: Store + ?Sized, R: Rng> Session<'s, S, R> {
    pub fn new(store: &'s S, matcher: &MatcherConfig, rng: R) -> Self {
        Self {
            analyser: Analyser::new(store, PatternCompiler::new(matcher.word_class.as_str())),
            builder: Builder::new(store, rng),
        }
    }

    pub fn respond(&mut self, cancel: &CancelToken, sentence: &str) -> Reply {
        let topics = self.analyser.analyse_topics(cancel, sentence);
        debug!("Matched topics: {:?}", topics);
        let text = self.builder.make_answer(cancel, &topics);
        Reply { topics, text }
    }
}
