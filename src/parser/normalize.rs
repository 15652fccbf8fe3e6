//! Candidate link normalization and validation.
//!
//! Candidates come out of [`extract_links`](super::extract_links) as raw
//! attribute values. Hostless candidates are prefixed with the base domain by
//! plain concatenation; the result is then checked as a request URI.

use tracing::{debug, trace};
use url::Url;

use super::error::ParseError;

/// Returns `true` when `candidate` parses as a URL with a non-empty host.
///
/// Unparsable strings are hostless. A scheme-relative `//host/path` has a host.
#[must_use]
pub fn has_host(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(parsed) => parsed.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) if candidate.starts_with("//") => Url::parse(&format!("http:{candidate}"))
            .ok()
            .and_then(|parsed| parsed.host_str().map(|host| !host.is_empty()))
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Prefixes hostless candidates with `base_domain`; returns others unchanged.
///
/// This is string concatenation, not path joining: a candidate that does not
/// start with `/` produces `https://example.comrelative/x.pdf`, which later
/// fails to download.
#[must_use]
pub fn resolve(candidate: &str, base_domain: &str) -> String {
    if has_host(candidate) {
        candidate.to_string()
    } else {
        format!("{base_domain}{candidate}")
    }
}

/// Returns `true` when `candidate` is a syntactically valid request URI.
///
/// A bare absolute path such as `/x.pdf` is valid here even though it has no
/// host, so this check belongs after [`resolve`].
#[must_use]
pub fn is_valid(candidate: &str) -> bool {
    validate_request_uri(candidate).is_ok()
}

/// Resolves `candidate` against `base_domain` and validates the result.
///
/// # Errors
///
/// Returns [`ParseError::InvalidUrl`] when the resolved string is not a
/// request URI, or is one but lacks a scheme and host.
pub fn resolve_candidate(candidate: &str, base_domain: &str) -> Result<String, ParseError> {
    let resolved = resolve(candidate, base_domain);
    trace!(candidate = %candidate, resolved = %resolved, "resolved candidate");

    validate_request_uri(&resolved)?;

    let absolute = Url::parse(&resolved)
        .ok()
        .is_some_and(|parsed| parsed.host_str().is_some_and(|host| !host.is_empty()));
    if !absolute {
        debug!(url = %resolved, "valid request URI but not absolute");
        return Err(ParseError::not_absolute(&resolved));
    }

    Ok(resolved)
}

/// Request-URI check: an absolute URI, or an absolute path starting with `/`.
fn validate_request_uri(candidate: &str) -> Result<(), ParseError> {
    if candidate.is_empty() {
        return Err(ParseError::empty());
    }
    if candidate.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return Err(ParseError::control_character(candidate));
    }
    if candidate.starts_with('/') {
        return Ok(());
    }
    Url::parse(candidate)
        .map(|_| ())
        .map_err(|e| ParseError::not_request_uri(candidate, &e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BASE: &str = "https://cam2.com";

    #[test]
    fn test_has_host_relative_path() {
        assert!(!has_host("relative/path.pdf"));
    }

    #[test]
    fn test_has_host_absolute_url() {
        assert!(has_host("https://cam2.com/x.pdf"));
    }

    #[test]
    fn test_has_host_not_a_url() {
        assert!(!has_host("not a url"));
    }

    #[test]
    fn test_has_host_absolute_path() {
        assert!(!has_host("/product/x.pdf?v=2"));
    }

    #[test]
    fn test_has_host_scheme_relative() {
        assert!(has_host("//cdn.cam2.com/x.pdf"));
    }

    #[test]
    fn test_has_host_file_url_has_empty_host() {
        assert!(!has_host("file:///tmp/x.pdf"));
    }

    #[test]
    fn test_resolve_prefixes_hostless() {
        assert_eq!(
            resolve("/product/x.pdf?v=2", BASE),
            "https://cam2.com/product/x.pdf?v=2"
        );
    }

    #[test]
    fn test_resolve_keeps_absolute_unchanged() {
        let url = "https://cam2.com/data-sheets/y.PDF";
        assert_eq!(resolve(url, BASE), url);
    }

    #[test]
    fn test_resolve_is_plain_concatenation() {
        // No path joining: the missing slash is the caller's problem.
        assert_eq!(resolve("docs/x.pdf", BASE), "https://cam2.comdocs/x.pdf");
    }

    #[test]
    fn test_is_valid_absolute_url() {
        assert!(is_valid("https://cam2.com/product/x.pdf?v=2"));
    }

    #[test]
    fn test_is_valid_bare_absolute_path() {
        assert!(is_valid("/x.pdf"));
    }

    #[test]
    fn test_is_valid_rejects_relative_path() {
        assert!(!is_valid("docs/x.pdf"));
    }

    #[test]
    fn test_is_valid_rejects_empty() {
        assert!(!is_valid(""));
    }

    #[test]
    fn test_is_valid_rejects_control_characters() {
        assert!(!is_valid("https://cam2.com/a\tb.pdf"));
        assert!(!is_valid("/a\nb.pdf"));
    }

    #[test]
    fn test_resolve_candidate_end_to_end_pair() {
        assert_eq!(
            resolve_candidate("/product/x.pdf?v=2", BASE).unwrap(),
            "https://cam2.com/product/x.pdf?v=2"
        );
        assert_eq!(
            resolve_candidate("https://cam2.com/data-sheets/y.PDF", BASE).unwrap(),
            "https://cam2.com/data-sheets/y.PDF"
        );
    }

    #[test]
    fn test_resolve_candidate_rejects_scheme_relative() {
        let err = resolve_candidate("//cdn.cam2.com/x.pdf", BASE).unwrap_err();
        assert!(matches!(err, ParseError::InvalidUrl { .. }));
    }

    #[test]
    fn test_resolve_candidate_rejects_bare_path_base() {
        // An empty base leaves a hostless path, which is valid but not absolute.
        let err = resolve_candidate("/x.pdf", "").unwrap_err();
        assert_eq!(err, ParseError::not_absolute("/x.pdf"));
    }

    #[test]
    fn test_resolve_candidate_rejects_control_characters() {
        assert!(resolve_candidate("/a\u{1}.pdf", BASE).is_err());
    }
}
