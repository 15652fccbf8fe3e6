//! The aggregate file: every fetched page body, appended in seed order.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use url::Url;

use super::error::StoreError;

/// Extension of the aggregate file.
pub const AGGREGATE_EXTENSION: &str = ".html";

/// Derives the aggregate file name from the base domain.
///
/// The name is the second-to-last label of the host plus `.html`
/// (`https://www.cam2.com` → `cam2.html`). A single-label host is used whole;
/// an unparsable base gives a bare `.html`.
///
/// ```
/// use harvester_core::crawl::aggregate_file_name;
///
/// assert_eq!(aggregate_file_name("https://cam2.com"), "cam2.html");
/// assert_eq!(aggregate_file_name("https://blog.my-site.co.uk"), "co.html");
/// ```
#[must_use]
pub fn aggregate_file_name(base_domain: &str) -> String {
    let host = Url::parse(base_domain)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_default();

    let labels: Vec<&str> = host.split('.').collect();
    let name = if labels.len() >= 2 {
        labels[labels.len() - 2]
    } else {
        host.as_str()
    };
    format!("{name}{AGGREGATE_EXTENSION}")
}

/// Append-only text file accumulating fetched pages for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateStore {
    path: PathBuf,
}

impl AggregateStore {
    /// Creates a handle for the file at `path`. Nothing is touched on disk.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file left by a previous run, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be removed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn reset(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("removed stale aggregate file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::new("remove", &self.path, e)),
        }
    }

    /// Appends `content` followed by a newline, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be opened or written.
    pub async fn append(&self, content: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::new("open", &self.path, e))?;

        let mut record = String::with_capacity(content.len() + 1);
        record.push_str(content);
        record.push('\n');

        file.write_all(record.as_bytes())
            .await
            .map_err(|e| StoreError::new("append", &self.path, e))?;
        file.flush()
            .await
            .map_err(|e| StoreError::new("append", &self.path, e))?;
        Ok(())
    }

    /// Reads the whole file back as one string.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read.
    pub async fn read_all(&self) -> Result<String, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StoreError::new("read", &self.path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
