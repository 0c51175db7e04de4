//! Href splitting and relative reference resolution.
//!
//! Implements the subset of RFC 3986 needed to turn a document relative
//! link into an absolute URL: component splitting (appendix B), reference
//! resolution (section 5.2) and dot segment removal (section 5.2.4).

use anyhow::{Context, Result, bail};
use std::fmt;
use std::str::FromStr;

/// Components of a link destination.
///
/// Each component borrows verbatim from the original href, so query and
/// fragment can be reattached exactly as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HrefParts<'a> {
    pub scheme: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

/// Splits href into scheme, authority, path, query and fragment.
///
/// A leading `name:` is only treated as scheme when `name` is a valid
/// scheme (ASCII letter followed by letters, digits, `+`, `-` or `.`).
/// Otherwise the whole prefix belongs to the path, so `weird:name.md`
/// style hrefs without a valid scheme stay relative.
///
/// # Errors
///
/// Returns error if the authority contains unbalanced IPv6 brackets.
pub fn split_href(href: &str) -> Result<HrefParts<'_>> {
    let (rest, fragment) = match href.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (href, None),
    };

    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (rest, Some(query)),
        None => (rest, None),
    };

    let (scheme, rest) = match rest.find([':', '/']) {
        Some(idx) if rest.as_bytes()[idx] == b':' && is_valid_scheme(&rest[..idx]) => {
            (Some(&rest[..idx]), &rest[idx + 1..])
        }
        _ => (None, rest),
    };

    let (authority, path) = match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find('/').unwrap_or(after.len());
            (Some(&after[..end]), &after[end..])
        }
        None => (None, rest),
    };

    if let Some(authority) = authority
        && authority.contains('[') != authority.contains(']')
    {
        bail!("Invalid IPv6 authority in link: {}", href);
    }

    Ok(HrefParts {
        scheme,
        authority,
        path,
        query,
        fragment,
    })
}

fn is_valid_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Absolute URL used as the root for resolving relative links.
///
/// Must carry a scheme and an authority (`https://host/...`). The path
/// usually ends with `/`: like any relative reference resolution, the last
/// path segment of the base is replaced, not extended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    raw: String,
    scheme: String,
    authority: String,
    path: String,
    query: Option<String>,
}

impl BaseUrl {
    /// Parses absolute base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the URL has no scheme or no authority component.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let parts =
            split_href(input).with_context(|| format!("Failed to parse base URL: {}", input))?;

        let Some(scheme) = parts.scheme else {
            bail!("Base URL must be absolute (missing scheme): {}", input);
        };
        let Some(authority) = parts.authority else {
            bail!("Base URL must include a host: {}", input);
        };

        Ok(Self {
            raw: input.to_string(),
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            path: parts.path.to_string(),
            query: parts.query.map(String::from),
        })
    }

    /// Returns base URL exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns path component of the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolves reference against this base per RFC 3986 section 5.2.2.
    ///
    /// Query and fragment of the reference are carried over verbatim.
    pub fn join(&self, reference: &HrefParts<'_>) -> String {
        let (scheme, authority, path, query) = if let Some(scheme) = reference.scheme {
            (
                scheme,
                reference.authority,
                remove_dot_segments(reference.path),
                reference.query,
            )
        } else if reference.authority.is_some() {
            (
                self.scheme.as_str(),
                reference.authority,
                remove_dot_segments(reference.path),
                reference.query,
            )
        } else if reference.path.is_empty() {
            (
                self.scheme.as_str(),
                Some(self.authority.as_str()),
                self.path.clone(),
                reference.query.or(self.query.as_deref()),
            )
        } else if reference.path.starts_with('/') {
            (
                self.scheme.as_str(),
                Some(self.authority.as_str()),
                remove_dot_segments(reference.path),
                reference.query,
            )
        } else {
            (
                self.scheme.as_str(),
                Some(self.authority.as_str()),
                remove_dot_segments(&self.merge(reference.path)),
                reference.query,
            )
        };

        let mut url = String::with_capacity(self.raw.len() + reference.path.len());
        url.push_str(scheme);
        url.push(':');
        if let Some(authority) = authority {
            url.push_str("//");
            url.push_str(authority);
        }
        url.push_str(&path);
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        if let Some(fragment) = reference.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }

    fn merge(&self, relative: &str) -> String {
        if self.path.is_empty() {
            return format!("/{}", relative);
        }

        match self.path.rfind('/') {
            Some(idx) => format!("{}{}", &self.path[..=idx], relative),
            None => relative.to_string(),
        }
    }
}

impl FromStr for BaseUrl {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Removes `.` and `..` segments from path (RFC 3986 section 5.2.4).
///
/// Parent segments never climb above the root; surplus `..` are dropped.
pub fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let skip = usize::from(input.starts_with('/'));
            let end = input[skip..].find('/').map_or(input.len(), |idx| idx + skip);
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }

    output
}

fn pop_segment(output: &mut String) {
    match output.rfind('/') {
        Some(idx) => output.truncate(idx),
        None => output.clear(),
    }
}
