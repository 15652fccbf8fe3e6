//! Download engine for bounded-concurrency document downloads.
//!
//! This module provides the `DownloadEngine` which runs a list of document
//! URLs through [`HttpClient::download_document`] using a semaphore-based
//! concurrency limit.
//!
//! # Overview
//!
//! URLs that sanitize to the same file name share one destination lock,
//! taken in list order. A later URL only runs once the earlier attempt has
//! finished, and then sees the file on disk (skipped) or, if the earlier
//! attempt failed, downloads it itself.
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::download::{DownloadEngine, HttpClient};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(4)?;
//! let client = HttpClient::new();
//! let urls = vec!["https://example.com/sds/oil.pdf".to_string()];
//! let stats = engine.run(&urls, &client, Path::new("./PDFs")).await?;
//! println!("Downloaded: {}, Skipped: {}, Failed: {}", stats.downloaded(), stats.skipped(), stats.failed());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard, Semaphore};
use tracing::{debug, info, instrument, warn};

use super::HttpClient;
use super::client::DownloadOutcome;
use super::filename::destination_path;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 32;

/// Default concurrency: one download at a time, in list order.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Statistics from one engine run.
///
/// Uses atomic counters so concurrent download tasks can update them.
#[derive(Debug, Default)]
pub struct DownloadStats {
    downloaded: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of files written.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded.load(Ordering::SeqCst)
    }

    /// Returns the number of URLs skipped because the destination already
    /// existed, including files written earlier in the same run.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Returns the number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the total number of URLs handled.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded() + self.skipped() + self.failed()
    }

    fn increment_downloaded(&self) {
        self.downloaded.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> Self {
        Self {
            downloaded: AtomicUsize::new(self.downloaded()),
            skipped: AtomicUsize::new(self.skipped()),
            failed: AtomicUsize::new(self.failed()),
        }
    }
}

/// Download engine for bounded-concurrency document downloads.
///
/// # Concurrency Model
///
/// - Each download runs in its own Tokio task
/// - A semaphore permit is acquired before spawning, so dispatch follows list
///   order and a limit of 1 is fully sequential
/// - The destination lock is taken in the dispatch loop before the permit;
///   a URL whose destination is still in flight holds up dispatch until that
///   attempt finishes
/// - Permits and destination locks are released when the task finishes (RAII)
#[derive(Debug)]
pub struct DownloadEngine {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    destinations: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl DownloadEngine {
    /// Creates a new download engine with the given concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-32).
    ///
    /// # Example
    ///
    /// ```
    /// use harvester_core::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(4).unwrap();
    /// assert_eq!(engine.concurrency(), 4);
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            destinations: DashMap::new(),
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Locks a destination path, waiting for any attempt already holding it.
    async fn lock_destination(&self, path: PathBuf) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(self.destinations.entry(path).or_default().value());
        lock.lock_owned().await
    }

    /// Downloads every URL into `output_dir` and returns the counts.
    ///
    /// Individual download failures do NOT cause this method to error; they
    /// are logged by the client and counted in the stats.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    #[instrument(skip(self, urls, client), fields(urls = urls.len(), output_dir = %output_dir.display()))]
    pub async fn run(
        &self,
        urls: &[String],
        client: &HttpClient,
        output_dir: &Path,
    ) -> Result<DownloadStats, EngineError> {
        let stats = Arc::new(DownloadStats::new());
        let mut handles = Vec::with_capacity(urls.len());

        info!(concurrency = self.concurrency, "starting downloads");

        for url in urls {
            let destination = destination_path(output_dir, url);
            let destination_guard = self.lock_destination(destination).await;

            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let client = client.clone();
            let stats = Arc::clone(&stats);
            let output_dir = output_dir.to_path_buf();
            let url = url.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let _destination_guard = destination_guard;

                match client.download_document(&url, &output_dir).await {
                    Ok(DownloadOutcome::Downloaded { .. }) => stats.increment_downloaded(),
                    Ok(DownloadOutcome::AlreadyExists { .. }) => stats.increment_skipped(),
                    Err(e) => {
                        warn!(url = %url, kind = e.kind(), error = %e, "download failed");
                        stats.increment_failed();
                    }
                }
            }));
        }

        debug!(task_count = handles.len(), "waiting for downloads to complete");

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "download task panicked");
                stats.increment_failed();
            }
        }

        info!(
            downloaded = stats.downloaded(),
            skipped = stats.skipped(),
            failed = stats.failed(),
            "downloads complete"
        );

        Ok(Arc::try_unwrap(stats).unwrap_or_else(|shared| shared.snapshot()))
    }
}
