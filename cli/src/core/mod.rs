//! # Phatic Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Foundations shared by every command:
//! - `config`: loading, merging and validating `.phatic.toml`
//! - `error`: the `PhaticError` type and the crate-wide `Result` alias
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{PhaticError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
