//! Link rewriting for documents published outside the repository.

use anyhow::{Result, bail};
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

use super::href::{BaseUrl, split_href};

/// Inline markdown link, optionally preceded by `!` (image syntax).
///
/// The regex crate has no look-behind, so the `!` is captured and image
/// matches are skipped instead of excluded by the pattern.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[([^\[\]]*)\]\(([^\s)]+)\)").expect("link pattern is valid")
});

/// Classification of a link destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `http://`, `https://` or `mailto:` destination
    Absolute,
    /// Destination starting with `/`
    RootRelative,
    /// Document relative link to a markdown file
    Markdown,
    /// Anything else: anchors, relative non markdown files
    Other,
}

impl LinkKind {
    /// Classifies href without resolving it.
    ///
    /// Markdown detection looks at the path only, so `guide.md?x#y` counts
    /// while `guide.html#readme.md` does not. Extension match ignores ASCII
    /// case.
    pub fn classify(href: &str) -> Self {
        if href.starts_with("http://") || href.starts_with("https://") || href.starts_with("mailto:")
        {
            return Self::Absolute;
        }

        if href.starts_with('/') {
            return Self::RootRelative;
        }

        let path = href.split(['?', '#']).next().unwrap_or("");
        let bytes = path.as_bytes();
        if bytes.len() >= 3 && bytes[bytes.len() - 3..].eq_ignore_ascii_case(b".md") {
            Self::Markdown
        } else {
            Self::Other
        }
    }
}

/// Non image markdown link found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<'a> {
    pub text: &'a str,
    pub href: &'a str,
    pub kind: LinkKind,
    /// Byte range of the whole `[text](href)` span
    pub span: Range<usize>,
}

impl Link<'_> {
    /// Returns 1 based line number of the link within `document`.
    pub fn line(&self, document: &str) -> usize {
        document[..self.span.start].matches('\n').count() + 1
    }
}

/// Rewrites relative markdown links to absolute URLs.
///
/// Transforms document relative links to other markdown files
/// (docs/guide.md, ../CHANGELOG.md) into URLs rooted at the base, so the
/// document still links correctly when rendered away from the repository,
/// for example as a package long description.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    base: BaseUrl,
}

impl LinkRewriter {
    /// Creates rewriter resolving against `base`.
    pub fn new(base: BaseUrl) -> Self {
        Self { base }
    }

    /// Returns the configured base URL.
    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    /// Lists non image links in document order.
    pub fn links<'a>(&self, document: &'a str) -> Vec<Link<'a>> {
        LINK_RE
            .captures_iter(document)
            .filter(|caps| caps[1].is_empty())
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let text = caps.get(2)?.as_str();
                let href = caps.get(3)?.as_str();
                Some(Link {
                    text,
                    href,
                    kind: LinkKind::classify(href),
                    span: whole.range(),
                })
            })
            .collect()
    }

    /// Resolves single href to its published form.
    ///
    /// Only [`LinkKind::Markdown`] hrefs without a scheme of their own
    /// change; every other href is returned as is.
    ///
    /// # Errors
    ///
    /// Returns error if a markdown href cannot be split into URL components.
    pub fn resolve(&self, href: &str) -> Result<String> {
        Ok(self.rebase(href)?.unwrap_or_else(|| href.to_string()))
    }

    /// Returns rebased href, or `None` when href stays unchanged.
    ///
    /// An href with its own scheme (`ftp://h/x.md`, `c:x.md`) is already
    /// absolute and is kept verbatim.
    fn rebase(&self, href: &str) -> Result<Option<String>> {
        if LinkKind::classify(href) != LinkKind::Markdown {
            return Ok(None);
        }

        let parts = split_href(href)?;
        if parts.scheme.is_some() {
            return Ok(None);
        }

        Ok(Some(self.base.join(&parts)))
    }

    /// Rewrites every qualifying link in document.
    ///
    /// Single left to right pass over non overlapping matches. Link text
    /// and all text outside rewritten hrefs is copied byte for byte.
    ///
    /// # Errors
    ///
    /// Returns error if a markdown href cannot be split into URL components.
    pub fn rewrite(&self, document: &str) -> Result<String> {
        let mut output = String::with_capacity(document.len());
        let mut last = 0;

        for caps in LINK_RE.captures_iter(document) {
            if !caps[1].is_empty() {
                continue;
            }

            let Some(href) = caps.get(3) else {
                continue;
            };
            let Some(resolved) = self.rebase(href.as_str())? else {
                continue;
            };
            debug!(href = href.as_str(), resolved = %resolved, "rewrote link");

            output.push_str(&document[last..href.start()]);
            output.push_str(&resolved);
            last = href.end();
        }

        output.push_str(&document[last..]);
        Ok(output)
    }

    /// Reads document from disk and rewrites its links.
    ///
    /// # Errors
    ///
    /// Same as [`LinkRewriter::read_document`], plus split failures.
    pub fn rewrite_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let document = Self::read_document(path)?;
        let rewritten = self.rewrite(&document)?;
        info!(document = %path.display(), "rewrote document links");
        Ok(rewritten)
    }

    /// Reads document text from disk.
    ///
    /// # Errors
    ///
    /// Returns "document not found" error if `path` does not exist. Any
    /// other read failure, including invalid UTF8, is returned as the
    /// underlying I/O error.
    pub fn read_document(path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("Document not found: {}", path.display());
        }

        Ok(fs::read_to_string(path)?)
    }
}

/// Rewrites relative markdown links in document against `base`.
///
/// # Errors
///
/// Returns error if a markdown href cannot be split into URL components.
pub fn rewrite(document: &str, base: &BaseUrl) -> Result<String> {
    LinkRewriter::new(base.clone()).rewrite(document)
}
