use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use http::header::{self, HeaderMap, HeaderValue};
use log::debug;
use tokio::sync::OnceCell;

use crate::{ErrorKind, Result, UrlStatus};

/// Default user agent, `proofer-bot/<PKG_VERSION>`.
pub const DEFAULT_USER_AGENT: &str = concat!("proofer-bot/", env!("CARGO_PKG_VERSION"));

/// Checks external URLs and remembers their status for the rest of the build.
#[derive(Debug)]
pub(crate) struct WebsiteChecker {
    reqwest_client: reqwest::Client,
    /// Status per exact URL string. Concurrent checks of the same URL wait
    /// on the same cell, so every URL is requested at most once.
    cache: DashMap<String, Arc<OnceCell<UrlStatus>>>,
    max_cache_size: usize,
    drain_response_body: bool,
}

impl WebsiteChecker {
    /// Build the HTTP client.
    ///
    /// Certificates are not verified: documentation sites linked from a
    /// build often sit behind self-signed or outdated TLS setups.
    pub(crate) fn new(
        timeout: Duration,
        max_redirects: usize,
        max_cache_size: usize,
        drain_response_body: bool,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(DEFAULT_USER_AGENT).map_err(ErrorKind::InvalidHeader)?,
        );
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("*"));

        let reqwest_client = reqwest::ClientBuilder::new()
            .gzip(true)
            .default_headers(headers)
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .timeout(timeout)
            .build()
            .map_err(ErrorKind::BuildClient)?;

        Ok(Self {
            reqwest_client,
            cache: DashMap::new(),
            max_cache_size,
            drain_response_body,
        })
    }

    /// Return the status of `url`, requesting it only the first time it is
    /// seen.
    pub(crate) async fn check(&self, url: &str) -> UrlStatus {
        let cell = self.cell(url);
        if let Some(status) = cell.get() {
            debug!("Cached: {url} [{status}]");
            return *status;
        }
        *cell.get_or_init(|| self.check_default(url)).await
    }

    /// The cell holding the status of `url`.
    ///
    /// Once the cache is full, unknown URLs get a cell of their own which is
    /// not remembered.
    fn cell(&self, url: &str) -> Arc<OnceCell<UrlStatus>> {
        if let Some(cell) = self.cache.get(url) {
            return Arc::clone(&cell);
        }
        if self.cache.len() >= self.max_cache_size {
            return Arc::default();
        }
        Arc::clone(&self.cache.entry(url.to_string()).or_default())
    }

    /// Check a URL using [reqwest](https://github.com/seanmonstar/reqwest).
    async fn check_default(&self, url: &str) -> UrlStatus {
        match self.reqwest_client.get(url).send().await {
            Ok(response) => {
                let status = UrlStatus::from(response.status());
                if self.drain_response_body {
                    // Hand the connection back to the pool in a clean state
                    let _ = response.bytes().await;
                }
                status
            }
            Err(ref e) => {
                debug!("Request to {url} failed: {e}");
                e.into()
            }
        }
    }

    /// Number of URLs with a remembered status
    pub(crate) fn cache_len(&self) -> usize {
        self.cache
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::DEFAULT_MAX_REDIRECTS;
    use test_utils::{mock_server, redirect_loop_server};

    fn checker() -> WebsiteChecker {
        WebsiteChecker::new(Duration::from_secs(10), DEFAULT_MAX_REDIRECTS, 100, true).unwrap()
    }

    #[tokio::test]
    async fn test_ok() {
        let mock_server = mock_server!(200);
        assert_eq!(checker().check(&mock_server.uri()).await, 200);
    }

    #[tokio::test]
    async fn test_status_is_passed_through() {
        let mock_server = mock_server!(500);
        assert_eq!(checker().check(&mock_server.uri()).await, 500);

        let mock_server = mock_server!(404);
        assert_eq!(checker().check(&mock_server.uri()).await, 404);
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = mock_server!(200, set_delay(Duration::from_millis(500)));
        let checker =
            WebsiteChecker::new(Duration::from_millis(50), DEFAULT_MAX_REDIRECTS, 100, true)
                .unwrap();
        assert_eq!(checker.check(&mock_server.uri()).await, UrlStatus::TIMEOUT);
    }

    #[tokio::test]
    async fn test_redirect_loop() {
        let mock_server = redirect_loop_server!();
        assert_eq!(
            checker().check(&mock_server.uri()).await,
            UrlStatus::NETWORK_FAILURE
        );
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Nothing listens on port 1
        assert_eq!(
            checker().check("http://127.0.0.1:1/").await,
            UrlStatus::NETWORK_FAILURE
        );
    }

    #[tokio::test]
    async fn test_status_is_cached() {
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let checker = checker();
        let url = format!("{}/page", mock_server.uri());
        assert_eq!(checker.check(&url).await, 503);
        assert_eq!(checker.check(&url).await, 503);
        assert_eq!(checker.cache_len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_share_one_request() {
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let checker = Arc::new(checker());
        let url = format!("{}/shared", mock_server.uri());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let checker = Arc::clone(&checker);
            let url = url.clone();
            handles.push(tokio::spawn(async move { checker.check(&url).await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 200);
        }

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(checker.cache_len(), 1);
    }

    #[tokio::test]
    async fn test_cache_is_bounded() {
        let mock_server = mock_server!(200);
        let checker =
            WebsiteChecker::new(Duration::from_secs(10), DEFAULT_MAX_REDIRECTS, 1, true).unwrap();
        checker.check(&format!("{}/a", mock_server.uri())).await;
        checker.check(&format!("{}/b", mock_server.uri())).await;
        assert_eq!(checker.cache_len(), 1);
    }

    #[tokio::test]
    async fn test_request_headers() {
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::header(
            "user-agent",
            DEFAULT_USER_AGENT,
        ))
        .and(wiremock::matchers::header("accept-language", "*"))
        .respond_with(wiremock::ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

        // Unmatched requests get a 404 from wiremock
        assert_eq!(checker().check(&mock_server.uri()).await, 204);
    }
}
