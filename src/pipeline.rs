//! The harvest pipeline: fetch seeds, collect, extract, resolve, download.
//!
//! The configuration is validated and the download engine built before any
//! request or filesystem change. After that, setup and per-item failures are
//! logged and counted, never fatal.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::{ConfigError, HarvestConfig};
use crate::crawl::{AggregateStore, fetch_page};
use crate::download::{DownloadEngine, EngineError, HttpClient};
use crate::parser::{dedup, extract_links, resolve_candidate};

/// Counts from one harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestReport {
    /// Seed pages attempted.
    pub pages_requested: usize,
    /// Seed pages whose body was read.
    pub pages_fetched: usize,
    /// Seed pages that failed and contributed empty text.
    pub pages_failed: usize,
    /// Candidate links extracted, duplicates included.
    pub candidates_found: usize,
    /// Candidate links left after deduplication.
    pub unique_candidates: usize,
    /// Unique candidates dropped as unusable URLs.
    pub invalid_candidates: usize,
    /// Documents written.
    pub downloaded: usize,
    /// Documents skipped because the file already existed.
    pub skipped: usize,
    /// Download attempts that failed.
    pub failed: usize,
}

/// Errors that stop a harvest run.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// The configuration was rejected before anything was fetched.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The download engine could not be built or stopped unexpectedly.
    #[error("download engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Runs one harvest to completion.
///
/// # Errors
///
/// Returns [`HarvestError::Config`] if the configuration is invalid, before
/// any page is requested, and [`HarvestError::Engine`] if the engine's
/// semaphore closes. Everything else is logged and counted.
#[instrument(skip_all, fields(base_domain = %config.base_domain, seeds = config.seed_urls.len()))]
pub async fn run_harvest(
    config: &HarvestConfig,
    client: &HttpClient,
) -> Result<HarvestReport, HarvestError> {
    config.validate()?;
    let engine = DownloadEngine::new(config.concurrency)?;
    let mut report = HarvestReport::default();

    ensure_output_dir(&config.output_dir).await;

    let store = AggregateStore::new(&config.aggregate_path);
    if let Err(e) = store.reset().await {
        warn!(error = %e, "could not remove previous aggregate file");
    }

    for seed in &config.seed_urls {
        report.pages_requested += 1;
        let page = match fetch_page(client, seed).await {
            Ok(body) => {
                report.pages_fetched += 1;
                body
            }
            Err(e) => {
                warn!(url = %seed, error = %e, "page fetch failed, using empty text");
                report.pages_failed += 1;
                String::new()
            }
        };
        if let Err(e) = store.append(&page).await {
            warn!(url = %seed, error = %e, "could not append page to aggregate file");
        }
    }

    let aggregate = store.read_all().await.unwrap_or_else(|e| {
        warn!(error = %e, "could not read aggregate file, nothing to extract");
        String::new()
    });

    let candidates = extract_links(&aggregate);
    report.candidates_found = candidates.len();
    let unique = dedup(candidates);
    report.unique_candidates = unique.len();

    let mut urls = Vec::with_capacity(unique.len());
    for candidate in &unique {
        match resolve_candidate(candidate, &config.base_domain) {
            Ok(url) => urls.push(url),
            Err(e) => {
                debug!(candidate = %candidate, error = %e, "dropping candidate");
                report.invalid_candidates += 1;
            }
        }
    }
    info!(
        found = report.candidates_found,
        unique = report.unique_candidates,
        usable = urls.len(),
        "document links collected"
    );

    let stats = engine.run(&urls, client, &config.output_dir).await?;
    report.downloaded = stats.downloaded();
    report.skipped = stats.skipped();
    report.failed = stats.failed();

    info!(
        pages_fetched = report.pages_fetched,
        pages_failed = report.pages_failed,
        downloaded = report.downloaded,
        skipped = report.skipped,
        failed = report.failed,
        "harvest complete"
    );
    Ok(report)
}

/// Creates the output directory (mode `0o755` on unix) if it is missing.
///
/// Failure is logged; the downloads that follow will then fail individually.
async fn ensure_output_dir(dir: &Path) {
    if tokio::fs::metadata(dir).await.is_ok_and(|meta| meta.is_dir()) {
        return;
    }

    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);

    match builder.create(dir).await {
        Ok(()) => debug!(dir = %dir.display(), "created output directory"),
        Err(e) => warn!(dir = %dir.display(), error = %e, "could not create output directory"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn offline_config(root: &Path) -> HarvestConfig {
        let mut config = HarvestConfig::default();
        config.seed_urls = Vec::new();
        config.output_dir = root.join("PDFs");
        config.aggregate_path = root.join("cam2.html");
        config
    }

    #[tokio::test]
    async fn test_run_with_no_seeds_creates_empty_aggregate_and_dir() {
        let dir = TempDir::new().unwrap();
        let config = offline_config(dir.path());

        let report = run_harvest(&config, &HttpClient::new()).await.unwrap();

        assert_eq!(report, HarvestReport::default());
        assert!(config.output_dir.is_dir());
        assert!(!config.aggregate_path.exists());
    }

    #[tokio::test]
    async fn test_unfetchable_seed_counts_as_failed_page() {
        let dir = TempDir::new().unwrap();
        let mut config = offline_config(dir.path());
        config.seed_urls = vec!["no scheme here".to_string()];

        let report = run_harvest(&config, &HttpClient::new()).await.unwrap();

        assert_eq!(report.pages_requested, 1);
        assert_eq!(report.pages_failed, 1);
        assert_eq!(report.pages_fetched, 0);
        // The failed page still contributes its empty line.
        assert_eq!(std::fs::read_to_string(&config.aggregate_path).unwrap(), "\n");
    }

    #[tokio::test]
    async fn test_stale_aggregate_is_replaced() {
        let dir = TempDir::new().unwrap();
        let mut config = offline_config(dir.path());
        config.seed_urls = vec!["not-a-url".to_string()];
        std::fs::write(&config.aggregate_path, r#"<a href="/stale.pdf">"#).unwrap();

        let report = run_harvest(&config, &HttpClient::new()).await.unwrap();

        assert_eq!(report.candidates_found, 0);
        assert_eq!(std::fs::read_to_string(&config.aggregate_path).unwrap(), "\n");
    }

    #[tokio::test]
    async fn test_invalid_concurrency_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut config = offline_config(dir.path());
        config.concurrency = 0;

        let result = run_harvest(&config, &HttpClient::new()).await;
        assert!(matches!(
            result,
            Err(HarvestError::Config(ConfigError::InvalidConcurrency { value: 0 }))
        ));
    }

    async fn assert_rejected_before_any_request(config: HarvestConfig, expected: &ConfigError) {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/x.pdf">"#))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut config = config;
        config.seed_urls = vec![format!("{}/page", mock_server.uri())];

        match run_harvest(&config, &HttpClient::new()).await {
            Err(HarvestError::Config(e)) => assert_eq!(&e, expected),
            other => panic!("expected a configuration error, got {other:?}"),
        }
        assert!(!config.output_dir.exists());
        assert!(!config.aggregate_path.exists());
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected_before_fetching_seeds() {
        let dir = TempDir::new().unwrap();
        let mut config = offline_config(dir.path());
        config.concurrency = 0;

        assert_rejected_before_any_request(config, &ConfigError::InvalidConcurrency { value: 0 })
            .await;
    }

    #[tokio::test]
    async fn test_empty_base_domain_rejected_before_fetching_seeds() {
        let dir = TempDir::new().unwrap();
        let mut config = offline_config(dir.path());
        config.base_domain = String::new();

        assert_rejected_before_any_request(config, &ConfigError::EmptyBaseDomain).await;
    }

    #[test]
    fn test_harvest_error_display() {
        let msg = HarvestError::from(ConfigError::EmptyBaseDomain).to_string();
        assert_eq!(msg, "invalid configuration: base domain must not be empty");
        let msg = HarvestError::from(EngineError::SemaphoreClosed).to_string();
        assert!(msg.contains("semaphore closed"));
    }

    #[tokio::test]
    async fn test_ensure_output_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let out: PathBuf = dir.path().join("a").join("b");
        ensure_output_dir(&out).await;
        ensure_output_dir(&out).await;
        assert!(out.is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ensure_output_dir_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("PDFs");
        ensure_output_dir(&out).await;
        let mode = std::fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        // umask may only remove bits
        assert_eq!(mode & !0o755, 0);
    }

    #[test]
    fn test_report_serializes_all_counts() {
        let report = HarvestReport {
            pages_requested: 2,
            downloaded: 1,
            ..HarvestReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pages_requested"], 2);
        assert_eq!(json["downloaded"], 1);
        assert_eq!(json["invalid_candidates"], 0);
    }
}
