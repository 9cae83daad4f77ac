//! # Phatic Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Filesystem helpers shared by configuration loading, seeding and the SQLite store.
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::ensure_parent_dir(Path::new("/var/lib/phatic/phatic.db"))?;
//! let seed = io::read_file_to_string(Path::new("seed.toml"))?;
//! ```
//!

/// Contains basic file I/O operations (e.g., `ensure_dir_exists`, `read_file_to_string`).
pub mod io;
