//! Markdown link rewriting.
//!
//! This module finds inline markdown links and rewrites document relative
//! links to other markdown files into absolute URLs rooted at a base URL.

mod href;
mod links;

pub use href::{BaseUrl, HrefParts, remove_dot_segments, split_href};
pub use links::{Link, LinkKind, LinkRewriter, rewrite};
