//! Document downloads: naming, fetching, validating and writing to disk.
//!
//! # Features
//!
//! - Deterministic file names derived from the URL alone
//! - Skip-if-exists before any request is made
//! - Status and Content-Type checks, zero-byte bodies rejected
//! - Create-new writes with partial-file cleanup
//! - Bounded concurrency with per-destination locks taken in list order
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let outcome = client
//!     .download_document("https://example.com/sds/oil.pdf", Path::new("./PDFs"))
//!     .await?;
//! println!("Saved: {}", outcome.path().display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod filename;

pub use client::{ClientSettings, DownloadOutcome, HttpClient, is_document_content_type};
pub use constants::{ACCEPTED_CONTENT_TYPES, DOCUMENT_EXTENSION, DOWNLOAD_TIMEOUT_SECS};
pub use engine::{
    DEFAULT_CONCURRENCY, DownloadEngine, DownloadStats, EngineError, MAX_CONCURRENCY,
    MIN_CONCURRENCY,
};
pub use error::DownloadError;
pub use filename::{destination_path, sanitize_filename};
