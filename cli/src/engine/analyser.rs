//! # Phatic Topic Analyser
//!
//! File: cli/src/engine/analyser.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Classifies a sentence against the stored templates and returns the topics
//! whose templates occur in it.
//!
//! ## Algorithm
//!
//! 1. **Normalise**: lower-case the sentence and put a space in front of every
//!    `, . ! ?` that does not already follow a space (`"привіт,світ"` becomes
//!    `"привіт ,світ"`).
//! 2. **Fetch** all templates, ordered by topic.
//! 3. **Translate** each pattern: `_` becomes `[<class>]*`, `$` becomes
//!    `[<class> ]*`; everything else is passed to the regex engine as written.
//!    Patterns that fail to compile are skipped.
//! 4. **Match** anywhere in the sentence. A matching template appends its topic
//!    unless the previous entry is that same topic. Only *consecutive* repeats
//!    collapse, so `[A, A, B, B, A]` yields `[A, B, A]`.
//! 5. Nothing matched, or the store failed: return `[unknown_topic]`.
//!
//! Compiled expressions are cached by raw pattern text in a [`PatternCache`].
//! After each fetch the cache drops patterns that are no longer stored, so a
//! reloaded template set invalidates stale entries.
//!
use super::marker::Marker;
use super::PUNCTUATION;
use crate::common::signal::CancelToken;
use crate::core::config::default_word_class;
use crate::core::error::is_cancelled;
use crate::store::{Store, Template, Topic};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Translates template patterns into regular expressions.
#[derive(Debug, Clone)]
pub struct PatternCompiler {
    word_class: String,
}

impl PatternCompiler {
    /// `word_class` is the body of the character class placeholders expand to, e.g. `а-я0-9`.
    pub fn new(word_class: impl Into<String>) -> Self {
        Self {
            word_class: word_class.into(),
        }
    }

    pub fn translate(&self, pattern: &str) -> String {
        pattern
            .replace(
                Marker::Word.symbol(),
                &Marker::Word.expression(&self.word_class),
            )
            .replace(
                Marker::Phrase.symbol(),
                &Marker::Phrase.expression(&self.word_class),
            )
    }

    pub fn compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(&self.translate(pattern))
    }
}

impl Default for PatternCompiler {
    fn default() -> Self {
        Self::new(default_word_class())
    }
}

/// Compiled templates keyed by raw pattern text.
///
/// Patterns that do not compile are remembered as `None` so they are not retried.
#[derive(Debug)]
pub struct PatternCache {
    compiler: PatternCompiler,
    compiled: HashMap<String, Option<Regex>>,
}

impl PatternCache {
    pub fn new(compiler: PatternCompiler) -> Self {
        Self {
            compiler,
            compiled: HashMap::new(),
        }
    }

    /// The compiled expression for `pattern`, or `None` if it does not compile.
    pub fn get(&mut self, pattern: &str) -> Option<&Regex> {
        if !self.compiled.contains_key(pattern) {
            let compiled = match self.compiler.compile(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    debug!("Skipping template {:?}: {}", pattern, e);
                    None
                }
            };
            self.compiled.insert(pattern.to_string(), compiled);
        }
        self.compiled.get(pattern).and_then(Option::as_ref)
    }

    /// Drops every cached pattern not present in `templates`.
    pub fn retain_templates(&mut self, templates: &[Template]) {
        let live: HashSet<&str> = templates.iter().map(|t| t.pattern.as_str()).collect();
        self.compiled.retain(|pattern, _| live.contains(pattern.as_str()));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.compiled.len()
    }
}

/// Lower-cases `sentence` and splits punctuation from the word before it.
///
/// A space goes in front of every `, . ! ?` unless it opens the sentence or
/// already follows a space. Runs of marks are split one by one, so `"так!!"`
/// becomes `"так ! !"`.
///
/// # Arguments
///
/// * `sentence` - The raw line as typed by the user.
///
/// # Returns
///
/// * `String` - The normalised sentence templates are matched against.
pub fn normalize_sentence(sentence: &str) -> String {
    let lowered = sentence.to_lowercase();
    let mut normalized = String::with_capacity(lowered.len() + 4);
    let mut previous: Option<char> = None;
    for c in lowered.chars() {
        if PUNCTUATION.contains(&c) && matches!(previous, Some(p) if p != ' ') {
            normalized.push(' ');
        }
        normalized.push(c);
        previous = Some(c);
    }
    normalized
}

/// Topics of the templates occurring in `sentence`, with consecutive repeats collapsed.
///
/// # Arguments
///
/// * `cache` - Compiled patterns, filled on demand. Patterns that fail to compile are skipped.
/// * `templates` - Templates to test, visited in the given order.
/// * `sentence` - The sentence, already passed through [`normalize_sentence`].
///
/// # Returns
///
/// * `Vec<Topic>` - Owning topics of every template found anywhere in `sentence`, in
///   template order. A topic is only dropped when it repeats the entry right before it.
///   Empty when nothing matched.
pub fn filter_topics(cache: &mut PatternCache, templates: &[Template], sentence: &str) -> Vec<Topic> {
    let mut topics: Vec<Topic> = Vec::new();
    for template in templates {
        let Some(regex) = cache.get(&template.pattern) else {
            continue;
        };
        if !regex.is_match(sentence) {
            continue;
        }
        trace!("Template {:?} matched ({})", template.pattern, template.topic);
        if topics.last() == Some(&template.topic) {
            continue;
        }
        topics.push(template.topic.clone());
    }
    topics
}

/// The topic matcher.
pub struct Analyser<'s, S: Store + ?Sized> {
    store: &'s S,
    patterns: PatternCache,
}

impl<'s, S: Store + ?Sized> Analyser<'s, S> {
    pub fn new(store: &'s S, compiler: PatternCompiler) -> Self {
        Self {
            store,
            patterns: PatternCache::new(compiler),
        }
    }

    /// Ordered topics matching `sentence`; never empty.
    ///
    /// # Arguments
    ///
    /// * `cancel` - Session token, passed on to the template fetch.
    /// * `sentence` - The raw user input.
    ///
    /// # Returns
    ///
    /// * `Vec<Topic>` - The matched topics, or `[unknown_topic]` when nothing matched,
    ///   the store failed or `cancel` was tripped. Errors are logged, never returned.
    pub fn analyse_topics(&mut self, cancel: &CancelToken, sentence: &str) -> Vec<Topic> {
        let templates = match self.store.templates(cancel) {
            Ok(templates) => templates,
            Err(e) => {
                if is_cancelled(&e) {
                    debug!("Template fetch cancelled.");
                } else {
                    warn!("Could not load templates, answering as unknown topic: {:#}", e);
                }
                return vec![Topic::unknown()];
            }
        };
        self.patterns.retain_templates(&templates);

        let normalized = normalize_sentence(sentence);
        let topics = filter_topics(&mut self.patterns, &templates, &normalized);
        debug!("Sentence {:?} matched topics {:?}", normalized, topics);
        if topics.is_empty() {
            return vec![Topic::unknown()];
        }
        topics
    }

    #[cfg(test)]
    fn cached_patterns(&self) -> usize {
        self.patterns.len()
    }
}
