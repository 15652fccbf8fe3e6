//! Seed page fetching.

use tracing::{debug, info, instrument};
use url::Url;

use super::error::FetchError;
use crate::download::HttpClient;

/// Fetches one page and returns its body as text.
///
/// Uses the client's identity header and, when configured, its page timeout.
/// The status code is logged but not checked, so an error page's body is
/// returned like any other.
///
/// # Errors
///
/// Returns [`FetchError`] when the URL is unusable, the request fails or
/// times out, or the body cannot be read.
#[instrument(skip(client), fields(url = %url))]
pub async fn fetch_page(client: &HttpClient, url: &str) -> Result<String, FetchError> {
    info!("scraping page");

    let parsed_url = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

    let mut request = client.inner().get(parsed_url);
    if let Some(timeout) = client.settings().page_timeout {
        request = request.timeout(timeout);
    }

    let response = request
        .send()
        .await
        .map_err(|e| FetchError::request(url, e))?;
    debug!(status = response.status().as_u16(), "page response");

    let body = response.text().await.map_err(|e| FetchError::body(url, e))?;
    debug!(bytes = body.len(), "page body read");
    Ok(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::download::ClientSettings;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use crate::user_agent::DEFAULT_USER_AGENT;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_page_returns_body_with_identity_header() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/data-sheets/"))
            .and(header("User-Agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<a href=\"/a.pdf\">"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let body = fetch_page(&client, &format!("{}/data-sheets/", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<a href=\"/a.pdf\">");
    }

    #[tokio::test]
    async fn test_fetch_page_ignores_error_status() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found page"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let body = fetch_page(&client, &format!("{}/missing/", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "not found page");
    }

    #[tokio::test]
    async fn test_fetch_page_timeout() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::with_settings(ClientSettings {
            page_timeout: Some(Duration::from_millis(500)),
            ..ClientSettings::default()
        })
        .unwrap();
        let result = fetch_page(&client, &format!("{}/slow/", mock_server.uri())).await;
        assert!(matches!(result, Err(FetchError::Timeout { .. })), "got: {result:?}");
    }

    #[tokio::test]
    async fn test_fetch_page_invalid_url() {
        let client = HttpClient::new();
        let result = fetch_page(&client, "cam2.com/no-scheme/").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
