//! Document link extraction and deduplication over raw page text.
//!
//! Extraction is a pattern scan, not an HTML parse: it tolerates malformed
//! markup and concatenated pages, and it also picks up `href` attributes that
//! sit inside scripts or comments.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

/// Pattern for `href="...pdf..."` attribute values.
///
/// The `href="` marker is case-sensitive; the extension literal is not, so
/// `Sheet.PDF` links are captured with their original case. Anything after the
/// extension up to the closing quote (query, fragment) is kept.
#[allow(clippy::expect_used)]
static DOCUMENT_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="([^"]+\.(?i:pdf)[^"]*)""#).expect("document link regex is valid") // Static pattern, safe to panic
});

/// Returns the captured link of every `href="...pdf..."` match, in textual order.
///
/// Duplicates are kept; see [`dedup`].
///
/// # Examples
///
/// ```
/// use harvester_core::parser::extract_links;
///
/// let links = extract_links(r#"<a href="/docs/a.pdf">A</a><a href="/b.html">B</a>"#);
/// assert_eq!(links, vec!["/docs/a.pdf".to_string()]);
/// ```
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
#[must_use]
pub fn extract_links(text: &str) -> Vec<String> {
    let links: Vec<String> = DOCUMENT_LINK_PATTERN
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|capture| {
            trace!(link = %capture.as_str(), "found document link");
            capture.as_str().to_string()
        })
        .collect();
    debug!(count = links.len(), "extracted document links");
    links
}

/// Collapses `items` to their first occurrences, preserving order.
///
/// Equality is exact string equality, so `a.pdf` and `A.PDF` both survive.
#[must_use]
pub fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
