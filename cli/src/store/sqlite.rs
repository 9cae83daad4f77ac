//! # Phatic SQLite Store
//!
//! File: cli/src/store/sqlite.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! SQLite-backed implementation of [`Store`], plus the schema and the create
//! operations used by `phatic seed`.
//!
//! ## Schema
//!
//! ```sql
//! topics(topic PRIMARY KEY)
//! templates(id, template, topic -> topics)
//! answers(id, answer, topic -> topics)
//! single_inserts(id, word, topic -> topics)
//! group_inserts(id, words, topic -> topics)
//! ```
//!
//! Foreign keys are enforced, and the create operations check the topic first so
//! a missing topic is reported as `PhaticError::TopicNotFound`. All text is stored
//! lower-cased, matching the lower-casing the matcher applies to user input.
//!
use super::{Answer, GroupInsert, SingleInsert, Store, Template, Topic};
use crate::common::fs::io;
use crate::common::signal::CancelToken;
use crate::core::error::{PhaticError, Result};
use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS topics (
        topic       TEXT    PRIMARY KEY    NOT NULL
    );
    CREATE TABLE IF NOT EXISTS templates (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        template    TEXT    NOT NULL,
        topic       TEXT    NOT NULL REFERENCES topics(topic)
    );
    CREATE TABLE IF NOT EXISTS answers (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        answer      TEXT    NOT NULL,
        topic       TEXT    NOT NULL REFERENCES topics(topic)
    );
    CREATE TABLE IF NOT EXISTS single_inserts (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        word        TEXT    NOT NULL,
        topic       TEXT    NOT NULL REFERENCES topics(topic)
    );
    CREATE TABLE IF NOT EXISTS group_inserts (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        words       TEXT    NOT NULL,
        topic       TEXT    NOT NULL REFERENCES topics(topic)
    );
"#;

const DROP_SCHEMA: &str = r#"
    DROP TABLE IF EXISTS templates;
    DROP TABLE IF EXISTS answers;
    DROP TABLE IF EXISTS single_inserts;
    DROP TABLE IF EXISTS group_inserts;
    DROP TABLE IF EXISTS topics;
"#;

/// A topic-owned text table: `(table name, text column)`.
type Table = (&'static str, &'static str);

const TEMPLATES: Table = ("templates", "template");
const ANSWERS: Table = ("answers", "answer");
const SINGLE_INSERTS: Table = ("single_inserts", "word");
const GROUP_INSERTS: Table = ("group_inserts", "words");

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self> {
        io::ensure_parent_dir(path)?;
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        info!("Opened dialogue database at {}", path.display());
        Self::from_connection(conn)
    }

    /// A private, empty database living in memory.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(PhaticError::from)?;
        Ok(Self { conn })
    }

    /// Creates every table that does not exist yet.
    pub fn create_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(PhaticError::from)
            .context("Failed to create schema")
    }

    /// Drops every table, discarding all dialogue data.
    pub fn drop_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(DROP_SCHEMA)
            .map_err(PhaticError::from)
            .context("Failed to drop schema")?;
        info!("Dropped dialogue tables.");
        Ok(())
    }

    /// Runs `f` inside a transaction, committing only if it succeeds.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(PhaticError::from)?;
        let value = f(self)?;
        tx.commit().map_err(PhaticError::from)?;
        Ok(value)
    }

    pub fn create_topic(&self, topic: &Topic) -> Result<Topic> {
        let topic = Topic::new(topic.as_str().to_lowercase());
        self.conn
            .execute("INSERT INTO topics (topic) VALUES (?1)", params![topic.as_str()])
            .map_err(PhaticError::from)
            .with_context(|| format!("Failed to create topic '{}'", topic))?;
        debug!("Created topic '{}'", topic);
        Ok(topic)
    }

    /// Looks a topic up by name, failing with `PhaticError::TopicNotFound`.
    pub fn topic(&self, name: &str) -> Result<Topic> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT topic FROM topics WHERE topic = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(PhaticError::from)?;
        found.map(Topic::new).ok_or_else(|| {
            PhaticError::TopicNotFound {
                topic: name.to_string(),
            }
            .into()
        })
    }

    pub fn topics(&self) -> Result<Vec<Topic>> {
        let mut stmt = self
            .conn
            .prepare("SELECT topic FROM topics ORDER BY topic ASC")
            .map_err(PhaticError::from)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(PhaticError::from)?;
        let mut topics = Vec::new();
        for row in rows {
            topics.push(Topic::new(row.map_err(PhaticError::from)?));
        }
        Ok(topics)
    }

    pub fn create_template(&self, template: &Template) -> Result<()> {
        self.insert_text(TEMPLATES, &template.pattern, &template.topic)
    }

    pub fn create_answer(&self, answer: &Answer) -> Result<()> {
        self.insert_text(ANSWERS, &answer.text, &answer.topic)
    }

    pub fn create_single_insert(&self, insert: &SingleInsert) -> Result<()> {
        self.insert_text(SINGLE_INSERTS, &insert.word, &insert.topic)
    }

    pub fn create_group_insert(&self, insert: &GroupInsert) -> Result<()> {
        self.insert_text(GROUP_INSERTS, &insert.words, &insert.topic)
    }

    fn insert_text(&self, (table, column): Table, text: &str, topic: &Topic) -> Result<()> {
        let topic = self.topic(&topic.as_str().to_lowercase())?;
        let sql = format!("INSERT INTO {table} ({column}, topic) VALUES (?1, ?2)");
        self.conn
            .execute(&sql, params![text.to_lowercase(), topic.as_str()])
            .map_err(PhaticError::from)
            .with_context(|| format!("Failed to insert into {table} for topic '{topic}'"))?;
        Ok(())
    }

    /// Lists `(text, topic)` pairs of a topic-owned table.
    fn list_text(
        &self,
        (table, column): Table,
        topic: Option<&Topic>,
        order_by: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<(String, Topic)>> {
        if cancel.is_cancelled() {
            anyhow::bail!(PhaticError::Cancelled);
        }

        let mut sql = format!("SELECT {column}, topic FROM {table}");
        if topic.is_some() {
            sql.push_str(" WHERE topic = ?1");
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);

        let mut stmt = self.conn.prepare(&sql).map_err(PhaticError::from)?;
        let rows = match topic {
            Some(topic) => stmt.query_map(params![topic.as_str()], text_row),
            None => stmt.query_map([], text_row),
        }
        .map_err(PhaticError::from)?;

        let mut list = Vec::new();
        for row in rows {
            list.push(row.map_err(PhaticError::from)?);
        }
        debug!("Listed {} rows from {}", list.len(), table);
        Ok(list)
    }
}

fn text_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, Topic)> {
    Ok((row.get(0)?, Topic::new(row.get::<_, String>(1)?)))
}

impl Store for SqliteStore {
    fn templates(&self, cancel: &CancelToken) -> Result<Vec<Template>> {
        Ok(self
            .list_text(TEMPLATES, None, "topic ASC, id ASC", cancel)?
            .into_iter()
            .map(|(pattern, topic)| Template { pattern, topic })
            .collect())
    }

    fn answers(&self, topic: Option<&Topic>, cancel: &CancelToken) -> Result<Vec<Answer>> {
        Ok(self
            .list_text(ANSWERS, topic, "id ASC", cancel)?
            .into_iter()
            .map(|(text, topic)| Answer { text, topic })
            .collect())
    }

    fn single_inserts(
        &self,
        topic: Option<&Topic>,
        cancel: &CancelToken,
    ) -> Result<Vec<SingleInsert>> {
        Ok(self
            .list_text(SINGLE_INSERTS, topic, "id ASC", cancel)?
            .into_iter()
            .map(|(word, topic)| SingleInsert { word, topic })
            .collect())
    }

    fn group_inserts(
        &self,
        topic: Option<&Topic>,
        cancel: &CancelToken,
    ) -> Result<Vec<GroupInsert>> {
        Ok(self
            .list_text(GROUP_INSERTS, topic, "id ASC", cancel)?
            .into_iter()
            .map(|(words, topic)| GroupInsert { words, topic })
            .collect())
    }
}
