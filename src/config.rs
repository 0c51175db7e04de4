//! Command line configuration.

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::markdown::BaseUrl;
use crate::version::DEFAULT_VERSION_PATTERN;

/// Command line configuration for mdrebase.
#[derive(Debug, Clone, Parser)]
#[command(name = "mdrebase", version, about, long_about = None)]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Rewrite relative markdown links to absolute URLs
    Rewrite(RewriteArgs),
    /// Extract release version from a source file into a version file
    Version(VersionArgs),
}

/// Arguments for `mdrebase rewrite`.
#[derive(Debug, Clone, Args)]
pub struct RewriteArgs {
    /// Markdown document to rewrite
    pub document: PathBuf,

    /// Base URL relative links resolve against
    #[arg(short, long, env = "MDREBASE_BASE_URL")]
    pub base_url: BaseUrl,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List links that would be rewritten and fail if there are any
    #[arg(long, conflicts_with = "output")]
    pub check: bool,
}

/// Arguments for `mdrebase version`.
#[derive(Debug, Clone, Args)]
pub struct VersionArgs {
    /// Source file declaring the version
    pub source: PathBuf,

    /// Regex with one capture group holding the version
    #[arg(short, long, default_value = DEFAULT_VERSION_PATTERN)]
    pub pattern: String,

    /// Version file to write
    #[arg(short, long, default_value = "VERSION")]
    pub output: PathBuf,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the input document or source file does not exist.
    pub fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Rewrite(args) => {
                if !args.document.exists() {
                    bail!("Document not found: {}", args.document.display());
                }
            }
            Command::Version(args) => {
                if !args.source.exists() {
                    bail!("Source file not found: {}", args.source.display());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rewrite_command() {
        // Arrange & Act
        let config = Config::try_parse_from([
            "mdrebase",
            "rewrite",
            "README.md",
            "--base-url",
            "https://github.com/org/repo/blob/master/",
        ])
        .expect("Should parse");

        // Assert
        let Command::Rewrite(args) = config.command else {
            panic!("Expected rewrite command");
        };
        assert_eq!(args.document, PathBuf::from("README.md"));
        assert_eq!(
            args.base_url.as_str(),
            "https://github.com/org/repo/blob/master/"
        );
        assert_eq!(args.output, None);
        assert!(!args.check);
        assert!(!config.verbose);
    }

    #[test]
    fn test_parse_rejects_relative_base_url() {
        // Arrange & Act
        let result = Config::try_parse_from([
            "mdrebase",
            "rewrite",
            "README.md",
            "--base-url",
            "docs/",
        ]);

        // Assert
        assert!(result.is_err(), "Relative base URL should be rejected");
    }

    #[test]
    fn test_parse_check_conflicts_with_output() {
        // Arrange & Act
        let result = Config::try_parse_from([
            "mdrebase",
            "rewrite",
            "README.md",
            "-b",
            "https://example.com/",
            "--check",
            "-o",
            "out.md",
        ]);

        // Assert
        assert!(result.is_err(), "--check and --output are exclusive");
    }

    #[test]
    fn test_parse_version_defaults() {
        // Arrange & Act
        let config =
            Config::try_parse_from(["mdrebase", "version", "src/pkg/__init__.py", "--verbose"])
                .expect("Should parse");

        // Assert
        let Command::Version(args) = config.command else {
            panic!("Expected version command");
        };
        assert_eq!(args.source, PathBuf::from("src/pkg/__init__.py"));
        assert_eq!(args.pattern, DEFAULT_VERSION_PATTERN);
        assert_eq!(args.output, PathBuf::from("VERSION"));
        assert!(config.verbose, "Global flag should apply after subcommand");
    }

    #[test]
    fn test_validate_missing_document() {
        // Arrange
        let config = Config {
            verbose: false,
            command: Command::Rewrite(RewriteArgs {
                document: PathBuf::from("does/not/exist.md"),
                base_url: BaseUrl::parse("https://example.com/").expect("Base should parse"),
                output: None,
                check: false,
            }),
        };

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("not found"), "Unexpected error: {}", err_msg);
    }

    #[test]
    fn test_validate_existing_source() {
        // Arrange
        let config = Config {
            verbose: false,
            command: Command::Version(VersionArgs {
                source: PathBuf::from("Cargo.toml"),
                pattern: DEFAULT_VERSION_PATTERN.to_string(),
                output: PathBuf::from("VERSION"),
            }),
        };

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_ok(), "Manifest should exist in crate root");
    }
}
