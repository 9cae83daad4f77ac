//! # Phatic Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Small wrappers around `std::fs` that add context to errors:
//! - **`ensure_dir_exists`**: creates a directory (and parents) unless it exists; fails if the path is a file.
//! - **`ensure_parent_dir`**: makes sure the directory that will hold a file exists. Used before opening the SQLite database.
//! - **`read_file_to_string`**: reads a whole file, used for configuration and seed data files.
//!
use crate::core::error::{PhaticError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// Creates the directory, including any missing parents, if the path does not
/// exist yet. Returns a `PhaticError::Config` if the path exists but is not a directory.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(PhaticError::Config(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Ensures the parent directory of `file` exists.
///
/// Bare file names (no parent component) are left alone.
pub fn ensure_parent_dir(file: &Path) -> Result<()> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Test `ensure_dir_exists` when the directory needs to be created, including parents.
    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        Ok(())
    }

    /// Test `ensure_dir_exists` when the target path exists but is a file.
    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("phatic.db");
        fs::write(&file_path, "")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    #[test]
    fn test_ensure_parent_dir() -> Result<()> {
        let base_dir = tempdir()?;
        let db_path = base_dir.path().join("data/nested/phatic.db");
        ensure_parent_dir(&db_path)?;
        assert!(base_dir.path().join("data/nested").is_dir());
        assert!(!db_path.exists());

        // A bare file name has an empty parent and needs nothing.
        ensure_parent_dir(Path::new("phatic.db"))?;
        Ok(())
    }

    #[test]
    fn test_read_file_not_found() -> Result<()> {
        let base_dir = tempdir()?;
        let result = read_file_to_string(&base_dir.path().join("seed.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read file"));
        Ok(())
    }
}
