//! Error types for candidate link resolution.

use thiserror::Error;

/// Reasons a candidate link is dropped before download.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The resolved string is not a usable request URI.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The string that failed validation (after resolution)
        url: String,
        /// Why the string was rejected
        reason: String,
    },
}

impl ParseError {
    /// Creates an `InvalidUrl` error for an empty candidate.
    #[must_use]
    pub fn empty() -> Self {
        Self::InvalidUrl {
            url: String::new(),
            reason: "empty URL".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a string containing control bytes.
    #[must_use]
    pub fn control_character(url: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: "contains ASCII control character".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a string that is neither an absolute
    /// URI nor an absolute path.
    #[must_use]
    pub fn not_request_uri(url: &str, parse_error: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: format!("not a request URI ({parse_error})"),
        }
    }

    /// Creates an `InvalidUrl` error for a valid request URI that is not
    /// absolute (no scheme or no host), which cannot be downloaded.
    #[must_use]
    pub fn not_absolute(url: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: "not an absolute URL with scheme and host".to_string(),
        }
    }
}
