//! HTTP client wrapper for page fetches and document downloads.
//!
//! This module provides the `HttpClient` struct which owns the shared
//! `reqwest::Client` (identity header, compression, connection pool) and
//! implements the single-document download state machine.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::constants::{ACCEPTED_CONTENT_TYPES, DOWNLOAD_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::destination_path;
use crate::user_agent;

/// Network settings shared by every request of a harvest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Identity header sent with every request.
    pub user_agent: String,
    /// Per-request ceiling for document downloads.
    pub download_timeout: Duration,
    /// Per-request ceiling for page fetches; `None` keeps client defaults.
    pub page_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_agent: user_agent::default_user_agent(),
            download_timeout: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
            page_timeout: None,
        }
    }
}

/// What a download attempt left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The document was fetched and written.
    Downloaded {
        /// Destination file.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// The destination already existed; nothing was fetched or written.
    AlreadyExists {
        /// Existing destination file.
        path: PathBuf,
    },
}

impl DownloadOutcome {
    /// Returns `true` when a file was written by this attempt.
    #[must_use]
    pub fn is_downloaded(&self) -> bool {
        matches!(self, Self::Downloaded { .. })
    }

    /// Returns the destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded { path, .. } | Self::AlreadyExists { path } => path,
        }
    }
}

/// HTTP client shared by the page fetcher and the downloader.
///
/// Create once per run and reuse, so page fetches and downloads share one
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use harvester_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() {
/// let client = HttpClient::new();
/// let written = client
///     .download("https://example.com/sds/oil.pdf", Path::new("./PDFs"))
///     .await;
/// println!("written: {written}");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    settings: ClientSettings,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with [`ClientSettings::default`].
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static default
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_settings(ClientSettings::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a client with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns the builder error when the TLS backend cannot be initialized or
    /// the User-Agent is not a valid header value.
    pub fn with_settings(settings: ClientSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .gzip(true)
            .build()?;
        Ok(Self { client, settings })
    }

    /// Returns the settings this client was built with.
    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Downloads one document into `output_dir`, returning `true` only when a
    /// file was written.
    ///
    /// Every failure is logged with its reason and collapsed to `false`, as is
    /// skipping an existing file.
    pub async fn download(&self, url: &str, output_dir: &Path) -> bool {
        match self.download_document(url, output_dir).await {
            Ok(outcome) => outcome.is_downloaded(),
            Err(error) => {
                warn!(url = %url, kind = error.kind(), error = %error, "download failed");
                false
            }
        }
    }

    /// Downloads one document into `output_dir`.
    ///
    /// The destination name comes from [`sanitize_filename`](super::sanitize_filename).
    /// An existing destination is reported without any request being made.
    /// The body is buffered in full before the file is created, so a failed
    /// download never leaves a file behind.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL cannot be parsed into a request
    /// - The request fails (network error, timeout)
    /// - The status is anything but 200
    /// - The Content-Type is not a document type
    /// - The body is empty
    /// - Creating or writing the file fails
    #[instrument(skip(self, output_dir), fields(url = %url))]
    pub async fn download_document(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let path = destination_path(output_dir, url);

        if file_exists(&path).await {
            info!(path = %path.display(), "file already exists, skipping");
            return Ok(DownloadOutcome::AlreadyExists { path });
        }

        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        debug!(timeout_secs = self.settings.download_timeout.as_secs(), "starting download");
        let response = self
            .client
            .get(parsed_url)
            .timeout(self.settings.download_timeout)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_document_content_type(&content_type) {
            return Err(DownloadError::unexpected_content_type(url, content_type));
        }

        let body = read_body(response, url).await?;
        if body.is_empty() {
            return Err(DownloadError::empty_body(url));
        }

        let Some(bytes) = write_new_file(&path, &body).await? else {
            info!(path = %path.display(), "file appeared during download, skipping");
            return Ok(DownloadOutcome::AlreadyExists { path });
        };

        info!(bytes, path = %path.display(), "successfully downloaded");
        Ok(DownloadOutcome::Downloaded { path, bytes })
    }
}

/// Returns `true` when a Content-Type value names a document.
///
/// Substring match, so parameters such as `; charset=binary` are tolerated.
#[must_use]
pub fn is_document_content_type(content_type: &str) -> bool {
    ACCEPTED_CONTENT_TYPES
        .iter()
        .any(|accepted| content_type.contains(accepted))
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| !meta.is_dir())
}

/// Reads the whole response body into memory.
async fn read_body(response: reqwest::Response, url: &str) -> Result<Vec<u8>, DownloadError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Creates `path` (never overwriting) and writes `body` to it.
///
/// Returns `Ok(None)` when the file already exists. A file left half-written
/// by a failed write is removed.
async fn write_new_file(path: &Path, body: &[u8]) -> Result<Option<u64>, DownloadError> {
    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(DownloadError::io(path, e)),
    };

    let written = match file.write_all(body).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        drop(file);
        debug!(path = %path.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(path).await;
        return Err(DownloadError::io(path, e));
    }

    Ok(Some(body.len() as u64))
}
