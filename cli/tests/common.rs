//! # Phatic CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests. Each `.rs` file in `cli/tests/` is
//! its own test crate and pulls this module in with `mod common;`.
//!
//! Commands run inside a [`Sandbox`]: a temporary directory used as working
//! directory and home, so no user or project `.phatic.toml` leaks into a test.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// `Command` for the compiled `phatic` binary.
pub fn phatic_cmd() -> Command {
    Command::cargo_bin("phatic").expect("Failed to find phatic binary for testing")
}

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("data").join("phatic.db")
    }

    /// `phatic` isolated in the sandbox, pointed at [`Sandbox::db_path`].
    pub fn cmd(&self) -> Command {
        let mut cmd = phatic_cmd();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join(".config"))
            .env("PHATIC_DB", self.db_path())
            .env_remove("PHATIC_RNG_SEED")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Seeds the sandbox database with the bundled data.
    pub fn seeded() -> Self {
        let sandbox = Self::new();
        sandbox.cmd().arg("seed").assert().success();
        sandbox
    }
}
