//! Release version extraction.
//!
//! Reads the version string declared in a source file (for example
//! `__version__ = "1.2.3"`) and writes it to a standalone version file
//! consumed by packaging tools.

use anyhow::{Context, Result, bail};
use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::Path;
use tracing::info;

/// Default pattern matching `__version__ = "x.y.z"` assignments.
pub const DEFAULT_VERSION_PATTERN: &str = r#"__version__\s*=\s*"(.*)""#;

/// Compiled version lookup pattern.
///
/// Matching is case insensitive and multi line. The first capture group
/// holds the version.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    regex: Regex,
}

impl VersionPattern {
    /// Compiles pattern.
    ///
    /// # Errors
    ///
    /// Returns error if pattern is not a valid regex or has no capture group.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()
            .with_context(|| format!("Invalid version pattern: {}", pattern))?;

        if regex.captures_len() < 2 {
            bail!("Version pattern needs a capture group: {}", pattern);
        }

        Ok(Self { regex })
    }

    /// Returns pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for VersionPattern {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_PATTERN).expect("default version pattern is valid")
    }
}

/// Extracts version from text using first pattern match.
///
/// # Errors
///
/// Returns error if pattern does not match or the captured version is empty.
pub fn extract_version(content: &str, pattern: &VersionPattern) -> Result<String> {
    let version = pattern
        .regex
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();

    if version.is_empty() {
        bail!("Version not found using pattern: {}", pattern.as_str());
    }

    Ok(version.to_string())
}

/// Reads source file and extracts version from it.
///
/// # Errors
///
/// Returns error if source file does not exist, cannot be read, or holds
/// no version.
pub fn extract_version_file(path: impl AsRef<Path>, pattern: &VersionPattern) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("Source file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;

    extract_version(&content, pattern)
        .with_context(|| format!("No version declared in {}", path.display()))
}

/// Writes version to file, replacing previous content.
///
/// # Errors
///
/// Returns error if the file cannot be written.
pub fn write_version_file(path: impl AsRef<Path>, version: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, version)
        .with_context(|| format!("Failed to write version file: {}", path.display()))?;

    info!(version, path = %path.display(), "wrote version file");
    Ok(())
}
