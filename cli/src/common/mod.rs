//! # Phatic Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared, cross-cutting utilities used by the commands and the store:
//!
//! - **`fs`**: Filesystem helpers (directory creation, file reading).
//! - **`signal`**: The `CancelToken` shared by the dialogue loop, engine and store,
//!   and the Ctrl+C listener that trips it.
//!

/// Utilities for filesystem operations.
pub mod fs;
/// Cancellation token and interrupt handling.
pub mod signal;
