//! URL handling module for Anchorwatch
//!
//! This module provides URL normalization, fragment splitting, reference
//! resolution against the crawl root, and the root scope check.

mod normalize;

pub use normalize::{normalize_url, normalize_url_string};

use crate::UrlError;
use url::Url;

/// The crawl boundary: every URL starting with the normalized root is in scope
///
/// In-scope pages are parsed for links and ids; anything else only gets an
/// existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    root: Url,
}

impl Scope {
    /// Normalizes `root` and builds a scope from it
    ///
    /// A fragment on the root is dropped.
    pub fn new(root: &str) -> Result<Self, UrlError> {
        let mut root = normalize_url(root)?;
        root.set_fragment(None);
        Ok(Self { root })
    }

    /// The normalized root URL
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The normalized root as a string prefix
    pub fn as_str(&self) -> &str {
        self.root.as_str()
    }

    /// Returns true if `url` (already normalized) lies under the root
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(self.root.as_str())
    }
}

/// Splits a URL string at its first `#`
///
/// Returns the URL without the fragment and the fragment itself, if any.
/// Percent-escapes in the fragment are decoded so it compares equal to the
/// raw `id` attribute it should match.
///
/// # Examples
///
/// ```
/// use anchorwatch::url::split_fragment;
///
/// assert_eq!(
///     split_fragment("https://example.com/page#intro"),
///     ("https://example.com/page", Some("intro".to_string()))
/// );
/// assert_eq!(split_fragment("https://example.com/"), ("https://example.com/", None));
/// ```
pub fn split_fragment(url: &str) -> (&str, Option<String>) {
    match url.split_once('#') {
        Some((base, fragment)) => (base, Some(normalize::percent_decode(fragment))),
        None => (url, None),
    }
}

/// Returns true if `href` names a scheme other than http or https
///
/// `javascript:`, `mailto:`, `tel:`, `data:` and the like cannot be fetched
/// and are skipped during link extraction.
pub fn has_foreign_scheme(href: &str) -> bool {
    match scheme_of(href.trim()) {
        Some(scheme) => {
            !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https")
        }
        None => false,
    }
}

/// Returns true if `href` is an absolute http or https URL
pub fn is_absolute_http(href: &str) -> bool {
    let href = href.trim();
    starts_with_ignore_case(href, "http://") || starts_with_ignore_case(href, "https://")
}

/// Resolves a link reference found on an in-scope page
///
/// Absolute http(s) references are taken as they are; everything else is
/// resolved relative to the crawl root.
pub fn resolve_reference(root: &Url, href: &str) -> Result<Url, UrlError> {
    let href = href.trim();
    let resolved = if is_absolute_http(href) {
        Url::parse(href)
    } else {
        root.join(href)
    };
    resolved.map_err(|e| UrlError::Parse(e.to_string()))
}

/// Extracts the RFC 3986 scheme of a reference, if it has one
fn scheme_of(href: &str) -> Option<&str> {
    let (scheme, _) = href.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}
