//! Run configuration for a harvest.
//!
//! [`HarvestConfig`] carries everything the pipeline needs: the base domain,
//! the seed pages, where files go, and the network settings. Built-in
//! defaults target `https://cam2.com` and its data-sheet pages.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::crawl::aggregate_file_name;
use crate::download::{
    ClientSettings, DEFAULT_CONCURRENCY, DOWNLOAD_TIMEOUT_SECS, MAX_CONCURRENCY, MIN_CONCURRENCY,
};
use crate::user_agent;

/// Base domain used when none is configured.
pub const DEFAULT_BASE_DOMAIN: &str = "https://cam2.com";

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "PDFs/";

const DEFAULT_SEEDS: &str = include_str!("default_seeds.txt");

/// Errors from validating a [`HarvestConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base domain is empty.
    #[error("base domain must not be empty")]
    EmptyBaseDomain,

    /// The base domain does not parse to a URL with a host.
    #[error("base domain '{base_domain}' must be an absolute URL with a host")]
    BaseDomainWithoutHost {
        /// The rejected value.
        base_domain: String,
    },

    /// Concurrency outside the supported range.
    #[error("invalid concurrency {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}")]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
    },

    /// A timeout of zero.
    #[error("{field} must be greater than zero")]
    ZeroTimeout {
        /// Name of the offending setting.
        field: &'static str,
    },
}

/// Everything one harvest run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Scheme and host prefixed to hostless candidate links.
    pub base_domain: String,
    /// Pages fetched, in order.
    pub seed_urls: Vec<String>,
    /// Directory documents are saved into.
    pub output_dir: PathBuf,
    /// File the fetched pages are collected into.
    pub aggregate_path: PathBuf,
    /// Identity header for every request.
    pub user_agent: String,
    /// Per-page request ceiling; `None` leaves page fetches unbounded.
    pub page_timeout: Option<Duration>,
    /// Per-download request ceiling.
    pub download_timeout: Duration,
    /// Maximum downloads in flight.
    pub concurrency: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DOMAIN)
    }
}

impl HarvestConfig {
    /// Creates a config for `base_domain` with the built-in defaults.
    ///
    /// The aggregate file is named after the domain (`https://cam2.com` →
    /// `cam2.html`) in the working directory.
    #[must_use]
    pub fn new(base_domain: impl Into<String>) -> Self {
        let base_domain = base_domain.into();
        let aggregate_path = PathBuf::from(aggregate_file_name(&base_domain));
        Self {
            base_domain,
            seed_urls: default_seed_urls(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            aggregate_path,
            user_agent: user_agent::default_user_agent(),
            page_timeout: None,
            download_timeout: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Checks the values a run cannot work with.
    ///
    /// An empty seed list is allowed; the run then finds nothing.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_domain.trim().is_empty() {
            return Err(ConfigError::EmptyBaseDomain);
        }
        let has_host = Url::parse(&self.base_domain)
            .ok()
            .and_then(|url| url.host_str().map(|host| !host.is_empty()))
            .unwrap_or(false);
        if !has_host {
            return Err(ConfigError::BaseDomainWithoutHost {
                base_domain: self.base_domain.clone(),
            });
        }
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(ConfigError::InvalidConcurrency {
                value: self.concurrency,
            });
        }
        if self.download_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout {
                field: "download timeout",
            });
        }
        if self.page_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ZeroTimeout {
                field: "page timeout",
            });
        }
        Ok(())
    }

    /// Network settings for the shared HTTP client.
    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            user_agent: self.user_agent.clone(),
            download_timeout: self.download_timeout,
            page_timeout: self.page_timeout,
        }
    }
}

/// The built-in seed pages.
#[must_use]
pub fn default_seed_urls() -> Vec<String> {
    parse_seed_list(DEFAULT_SEEDS)
}

/// Parses a seed list: one URL per line, blank lines and `#` comments skipped.
///
/// ```
/// use harvester_core::config::parse_seed_list;
///
/// let seeds = parse_seed_list("# pages\nhttps://a.test/one/\n\n  https://a.test/two/  \n");
/// assert_eq!(seeds, vec!["https://a.test/one/", "https://a.test/two/"]);
/// ```
#[must_use]
pub fn parse_seed_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
