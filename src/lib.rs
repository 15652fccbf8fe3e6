//! Harvester Core Library
//!
//! This library provides the core functionality for the harvester tool,
//! which collects PDF data sheets linked from a fixed set of product pages.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Run configuration and built-in defaults
//! - [`crawl`] - Seed page fetching and the aggregate page file
//! - [`parser`] - Link extraction, deduplication and URL resolution
//! - [`download`] - File naming, single downloads and the download engine
//! - [`pipeline`] - The end-to-end harvest run and its report

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod crawl;
pub mod download;
pub mod parser;
pub mod pipeline;
#[cfg(test)]
pub(crate) mod test_support;
pub mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, DEFAULT_BASE_DOMAIN, DEFAULT_OUTPUT_DIR, HarvestConfig};
pub use crawl::{AggregateStore, FetchError, StoreError, fetch_page};
pub use download::{
    ClientSettings, DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadOutcome,
    DownloadStats, EngineError, HttpClient, sanitize_filename,
};
pub use parser::{ParseError, dedup, extract_links, has_host, is_valid, resolve, resolve_candidate};
pub use pipeline::{HarvestError, HarvestReport, run_harvest};
