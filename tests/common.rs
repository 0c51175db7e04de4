//! Shared test utilities for integration tests.
//!
//! Provides helpers for laying out temporary documentation trees used
//! across multiple test files.

#![allow(dead_code)]

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Base URL used by most fixtures.
pub const GITHUB_BASE: &str = "https://github.com/org/repo/blob/master/";

/// Creates temporary directory holding the given files.
///
/// # Arguments
///
/// * `files`: Pairs of relative path and content
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn create_test_tree(files: &[(&str, &str)]) -> Result<TempDir> {
    let dir = TempDir::new()?;
    for (path, content) in files {
        write_file(dir.path(), path, content)?;
    }
    Ok(dir)
}

/// Writes file under root, creating parent directories as needed.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_file(root: &Path, path: &str, content: &str) -> Result<PathBuf> {
    let file_path = root.join(path);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file_path, content)?;
    Ok(file_path)
}
