//! # Phatic Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements the configuration system for Phatic, handling loading,
//! merging, validation, and access to configuration data. It supports a multi-level
//! configuration approach that combines defaults, user settings, and project-specific
//! overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.phatic.toml` in current directory or ancestors
//! 2. User-specific `~/.config/phatic/config.toml`
//! 3. Default values defined in the code
//!
//! Command-line options (`--db`) are applied on top by the command handlers.
//!
//! ## Examples
//!
//! ```toml
//! [database]
//! path = "~/dialogues/phatic.db"
//!
//! [dialogue]
//! bot_prompt = "bot>>"
//! quit_commands = ["/q", "bye"]
//!
//! [matcher]
//! word_class = "а-яіїєґ0-9"
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let db_path = &cfg.database.path;
//! let prompt = &cfg.dialogue.user_prompt;
//! ```
//!
use crate::core::error::{PhaticError, Result};
use crate::engine::marker::Marker;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
}

/// Where the topic/template/answer/insert tables live.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (can use ~). Will be expanded.
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Text framing of the interactive session (`phatic run`).
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DialogueConfig {
    /// Banner printed when the session starts.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Line printed when the user quits.
    #[serde(default = "default_farewell")]
    pub farewell: String,
    /// Prompt printed before reading each user line.
    #[serde(default = "default_user_prompt")]
    pub user_prompt: String,
    /// Prefix printed before each reply.
    #[serde(default = "default_bot_prompt")]
    pub bot_prompt: String,
    /// Inputs that end the session.
    #[serde(default = "default_quit_commands")]
    pub quit_commands: Vec<String>,
}

/// Pattern translation settings.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    /// Body of the regex character class both placeholders expand to.
    #[serde(default = "default_word_class")]
    pub word_class: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            farewell: default_farewell(),
            user_prompt: default_user_prompt(),
            bot_prompt: default_bot_prompt(),
            quit_commands: default_quit_commands(),
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            word_class: default_word_class(),
        }
    }
}

fn default_database_path() -> String {
    "~/.local/share/phatic/phatic.db".to_string()
}
fn default_greeting() -> String {
    "WELCOME TO PHATIC-DIALOGUE PROGRAM".to_string()
}
fn default_farewell() -> String {
    "BYE-BYE".to_string()
}
fn default_user_prompt() -> String {
    "you>> ".to_string()
}
fn default_bot_prompt() -> String {
    "ms.X>> ".to_string()
}
fn default_quit_commands() -> Vec<String> {
    vec!["/q".to_string(), "\\q".to_string(), "quit".to_string()]
}
pub fn default_word_class() -> String {
    "а-я0-9".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".phatic.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Phatic", "phatic") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.phatic.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root, stopping at the first `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = crate::common::fs::io::read_file_to_string(path)?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.database.path = if project_cfg.database.path != default_database_path() {
        project_cfg.database.path
    } else {
        user.database.path
    };
    merged.dialogue.greeting = if project_cfg.dialogue.greeting != default_greeting() {
        project_cfg.dialogue.greeting
    } else {
        user.dialogue.greeting
    };
    merged.dialogue.farewell = if project_cfg.dialogue.farewell != default_farewell() {
        project_cfg.dialogue.farewell
    } else {
        user.dialogue.farewell
    };
    merged.dialogue.user_prompt = if project_cfg.dialogue.user_prompt != default_user_prompt() {
        project_cfg.dialogue.user_prompt
    } else {
        user.dialogue.user_prompt
    };
    merged.dialogue.bot_prompt = if project_cfg.dialogue.bot_prompt != default_bot_prompt() {
        project_cfg.dialogue.bot_prompt
    } else {
        user.dialogue.bot_prompt
    };
    merged.dialogue.quit_commands =
        if project_cfg.dialogue.quit_commands != default_quit_commands() {
            project_cfg.dialogue.quit_commands
        } else {
            user.dialogue.quit_commands
        };
    merged.matcher.word_class = if project_cfg.matcher.word_class != default_word_class() {
        project_cfg.matcher.word_class
    } else {
        user.matcher.word_class
    };
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    config.database.path = shellexpand::tilde(&config.database.path).into_owned();
    debug!("Expanded database path: {}", config.database.path);
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    let class = &config.matcher.word_class;
    if class.is_empty() {
        return Err(anyhow!(PhaticError::Config(
            "matcher.word_class cannot be empty.".to_string()
        )));
    }
    if class.contains(|c| c == Marker::Word.symbol() || c == Marker::Phrase.symbol()) {
        return Err(anyhow!(PhaticError::Config(format!(
            "matcher.word_class '{}' cannot contain the placeholder characters '{}' or '{}'.",
            class,
            Marker::Word.symbol(),
            Marker::Phrase.symbol()
        ))));
    }
    if let Err(e) = regex::Regex::new(&format!("[{}]", class)) {
        return Err(anyhow!(PhaticError::Config(format!(
            "matcher.word_class '{}' is not a valid character class: {}",
            class, e
        ))));
    }
    if config.dialogue.quit_commands.is_empty() {
        return Err(anyhow!(PhaticError::Config(
            "dialogue.quit_commands needs at least one entry.".to_string()
        )));
    }
    if config.dialogue.quit_commands.iter().any(|c| c.trim().is_empty()) {
        return Err(anyhow!(PhaticError::Config(
            "dialogue.quit_commands cannot contain blank entries.".to_string()
        )));
    }
    if config.database.path.trim().is_empty() {
        return Err(anyhow!(PhaticError::Config(
            "database.path cannot be empty.".to_string()
        )));
    }
    info!("Configuration validation successful.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [database]
            path = "~/chat/phatic.db"

            [dialogue]
            bot_prompt = "bot>>"
            quit_commands = ["bye"]
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.database.path, "~/chat/phatic.db"); // Not yet expanded
        assert_eq!(config.dialogue.bot_prompt, "bot>>");
        assert_eq!(config.dialogue.user_prompt, default_user_prompt()); // Default
        assert_eq!(config.dialogue.quit_commands, vec!["bye"]);
        assert_eq!(config.matcher.word_class, "а-я0-9");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[matcher]\nalphabet = \"a-z\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            database: DatabaseConfig {
                path: "~/phatic_test.db".to_string(),
            },
            ..Default::default()
        };
        expand_config_paths(&mut config).unwrap();
        assert!(!config.database.path.starts_with('~'));
        assert!(config.database.path.ends_with("phatic_test.db"));

        let mut absolute = Config {
            database: DatabaseConfig {
                path: "/var/lib/phatic.db".to_string(),
            },
            ..Default::default()
        };
        expand_config_paths(&mut absolute).unwrap();
        assert_eq!(absolute.database.path, "/var/lib/phatic.db");
    }

    #[test]
    fn test_merge_prefers_project_values() {
        let user = Config {
            database: DatabaseConfig {
                path: "/user/phatic.db".to_string(),
            },
            dialogue: DialogueConfig {
                farewell: "ciao".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let project = Config {
            matcher: MatcherConfig {
                word_class: "a-z0-9".to_string(),
            },
            database: DatabaseConfig {
                path: "/project/phatic.db".to_string(),
            },
            ..Default::default()
        };

        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.database.path, "/project/phatic.db");
        assert_eq!(merged.dialogue.farewell, "ciao"); // project left it at default
        assert_eq!(merged.matcher.word_class, "a-z0-9");
    }

    #[test]
    fn test_find_project_config_stops_at_git() {
        let root = tempdir().unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        let repo = root.path().join("repo");
        let nested = repo.join("src");
        fs::create_dir_all(&nested).unwrap();

        // Found by walking up from a nested directory.
        assert_eq!(
            find_project_config_path(&nested),
            Some(root.path().join(PROJECT_CONFIG_FILENAME))
        );

        // A .git directory in between ends the search.
        fs::create_dir(repo.join(".git")).unwrap();
        assert_eq!(find_project_config_path(&nested), None);
    }

    #[test]
    fn test_validate_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_marker_in_word_class() {
        let config = Config {
            matcher: MatcherConfig {
                word_class: "a-z_".to_string(),
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("placeholder characters"));
    }

    #[test]
    fn test_validate_config_rejects_broken_class() {
        let config = Config {
            matcher: MatcherConfig {
                word_class: "я-а".to_string(), // reversed range
            },
            ..Default::default()
        };
        assert!(validate_config(&config)
            .unwrap_err()
            .to_string()
            .contains("not a valid character class"));
    }

    #[test]
    fn test_validate_config_rejects_blank_quit_command() {
        let config = Config {
            dialogue: DialogueConfig {
                quit_commands: vec!["quit".to_string(), "  ".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
