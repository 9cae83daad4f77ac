//! # Phatic Dialogue Engine
//!
//! File: cli/src/engine/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The engine turns a user sentence into a reply in two steps:
//!
//! ```text
//! sentence ──▶ Analyser::analyse_topics ──▶ [Topic] ──▶ Builder::make_answer ──▶ reply
//! ```
//!
//! - `analyser`: normalises the sentence, compiles stored templates into regular
//!   expressions (cached by pattern text) and collects the topics whose templates match.
//! - `builder`: picks one of those topics at random, picks one of its answers
//!   (or one of the unknown topic's answers) and fills the `$`/`_` markers with
//!   random inserts from the answer's topic.
//! - `marker`: the two placeholder markers shared by templates and answers.
//! - `random`: the uniform draw used for topics, answers and inserts.
//!
//! Neither step ever fails outward. Storage problems degrade to the unknown topic
//! and to the `"..."` reply respectively, so the dialogue loop always has
//! something to print.
//!

pub mod analyser;
pub mod builder;
pub mod marker;
pub mod random;

pub use analyser::{Analyser, PatternCompiler};
pub use builder::Builder;

/// Punctuation that is split from words in input and glued back in replies.
pub const PUNCTUATION: [char; 4] = [',', '.', '!', '?'];
