//! Constants for the download module (timeouts, document type acceptance).

/// Default per-download request timeout (15 minutes).
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 15 * 60;

/// Extension every saved document name ends with.
pub const DOCUMENT_EXTENSION: &str = ".pdf";

/// Token stripped from sanitized names wherever it occurs.
pub(crate) const NOISE_TOKEN: &str = "_pdf";

/// Content-Type substrings accepted as a document response.
pub const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["application/pdf", "binary/octet-stream"];
