//! Error types for page fetching and the aggregate store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching one seed page.
///
/// The HTTP status is never a failure here: any response body counts as
/// page text.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL cannot be turned into a request.
    #[error("invalid page URL: {url}")]
    InvalidUrl {
        /// The URL as given.
        url: String,
    },

    /// The request or body read exceeded the page timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The page URL.
        url: String,
    },

    /// Connection-level failure (DNS, refused, TLS).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The page URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but its body could not be read.
    #[error("failed to read body of {url}: {source}")]
    Body {
        /// The page URL.
        url: String,
        /// The underlying read error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an error for a failed send, promoting timeouts.
    pub fn request(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an error for a failed body read, promoting timeouts.
    pub fn body(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Body { url, source }
        }
    }
}

/// Errors from the on-disk aggregate file.
#[derive(Debug, Error)]
#[error("failed to {operation} aggregate file {path}: {source}")]
pub struct StoreError {
    /// What was being attempted (`remove`, `append`, `read`).
    pub operation: &'static str,
    /// The aggregate file path.
    pub path: PathBuf,
    /// The underlying IO error.
    #[source]
    pub source: std::io::Error,
}

impl StoreError {
    /// Creates a store error for `operation` on `path`.
    pub fn new(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            operation,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_invalid_url_display() {
        let msg = FetchError::invalid_url("::nope").to_string();
        assert!(msg.contains("invalid page URL"), "got: {msg}");
        assert!(msg.contains("::nope"), "got: {msg}");
    }

    #[test]
    fn test_store_error_display_names_operation_and_path() {
        let err = StoreError::new(
            "append",
            "cam2.html",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("append"), "got: {msg}");
        assert!(msg.contains("cam2.html"), "got: {msg}");
        assert!(msg.contains("denied"), "got: {msg}");
    }
}
