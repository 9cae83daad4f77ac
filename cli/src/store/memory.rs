//! In-memory [`Store`] for engine tests.
//!
//! Rows are kept in insertion order. `templates` sorts by topic like the SQLite
//! store does, and any list can be told to fail.

use super::{Answer, GroupInsert, SingleInsert, Store, Template, Topic};
use crate::common::signal::CancelToken;
use crate::core::error::{PhaticError, Result};

/// Which read should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum List {
    Templates,
    Answers,
    SingleInserts,
    GroupInserts,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    templates: Vec<Template>,
    answers: Vec<Answer>,
    single_inserts: Vec<SingleInsert>,
    group_inserts: Vec<GroupInsert>,
    failing: Option<List>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, pattern: &str, topic: &str) -> Self {
        self.templates.push(Template {
            pattern: pattern.to_string(),
            topic: Topic::from(topic),
        });
        self
    }

    pub fn answer(mut self, text: &str, topic: &str) -> Self {
        self.answers.push(Answer {
            text: text.to_string(),
            topic: Topic::from(topic),
        });
        self
    }

    pub fn single(mut self, word: &str, topic: &str) -> Self {
        self.single_inserts.push(SingleInsert {
            word: word.to_string(),
            topic: Topic::from(topic),
        });
        self
    }

    pub fn group(mut self, words: &str, topic: &str) -> Self {
        self.group_inserts.push(GroupInsert {
            words: words.to_string(),
            topic: Topic::from(topic),
        });
        self
    }

    pub fn failing(mut self, list: List) -> Self {
        self.failing = Some(list);
        self
    }

    fn check(&self, list: List, cancel: &CancelToken) -> Result<()> {
        if cancel.is_cancelled() {
            anyhow::bail!(PhaticError::Cancelled);
        }
        if self.failing == Some(list) {
            anyhow::bail!("{:?} unavailable", list);
        }
        Ok(())
    }
}

fn owned_by<'a, T: Clone + 'a>(
    rows: &'a [T],
    topic: Option<&Topic>,
    owner: impl Fn(&T) -> &Topic,
) -> Vec<T> {
    rows.iter()
        .filter(|row| topic.map_or(true, |t| owner(*row) == t))
        .cloned()
        .collect()
}

impl Store for MemoryStore {
    fn templates(&self, cancel: &CancelToken) -> Result<Vec<Template>> {
        self.check(List::Templates, cancel)?;
        let mut templates = self.templates.clone();
        templates.sort_by(|a, b| a.topic.cmp(&b.topic));
        Ok(templates)
    }

    fn answers(&self, topic: Option<&Topic>, cancel: &CancelToken) -> Result<Vec<Answer>> {
        self.check(List::Answers, cancel)?;
        Ok(owned_by(&self.answers, topic, |a| &a.topic))
    }

    fn single_inserts(
        &self,
        topic: Option<&Topic>,
        cancel: &CancelToken,
    ) -> Result<Vec<SingleInsert>> {
        self.check(List::SingleInserts, cancel)?;
        Ok(owned_by(&self.single_inserts, topic, |i| &i.topic))
    }

    fn group_inserts(
        &self,
        topic: Option<&Topic>,
        cancel: &CancelToken,
    ) -> Result<Vec<GroupInsert>> {
        self.check(List::GroupInserts, cancel)?;
        Ok(owned_by(&self.group_inserts, topic, |i| &i.topic))
    }
}
