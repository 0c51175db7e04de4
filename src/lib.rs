//! Rewrite relative markdown links to absolute URLs for package descriptions.

mod config;
mod markdown;
mod version;

pub use config::{Command, Config, RewriteArgs, VersionArgs};
pub use markdown::{
    BaseUrl, HrefParts, Link, LinkKind, LinkRewriter, remove_dot_segments, rewrite, split_href,
};
pub use version::{
    DEFAULT_VERSION_PATTERN, VersionPattern, extract_version, extract_version_file,
    write_version_file,
};
