use crate::ExtractError;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Configuration for the outbound HTML fetcher.
///
/// The defaults are the operative values for this service: an 8 second
/// wall-clock budget per fetch and at most 5 redirect hops. A cyclic
/// redirect chain fails at the hop limit rather than looping.
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_redirects: usize,
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                AppleWebKit/537.36 (KHTML, like Gecko) \
                Chrome/119.0.0.0 Safari/537.36"
                .to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// Fetches raw HTML for a validated URL. One attempt per call; retries are
/// deliberately left to callers.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self::new_with_config(FetcherConfig::default())
    }

    pub fn new_with_config(config: FetcherConfig) -> Self {
        let mut headers = HeaderMap::new();
        // Many origin servers degrade or reject requests without these.
        headers.insert(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .parse()
                .expect("static Accept header is valid"),
        );
        headers.insert(
            "Accept-Language",
            "en-US,en;q=0.9"
                .parse()
                .expect("static Accept-Language header is valid"),
        );

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to create HTTP client");
                panic!("Failed to initialize HTTP client: {}", e);
            });

        debug!(
            timeout_secs = config.timeout.as_secs(),
            max_redirects = config.max_redirects,
            "Fetcher initialized"
        );
        Fetcher { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the page body as text. Non-2xx final statuses are failures and
    /// the body is discarded untrusted.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        debug!(url = %url, "Starting fetch request");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractError::Timeout(e.to_string())
            } else {
                ExtractError::FetchFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::FetchFailed(format!(
                "origin returned status {}",
                status
            )));
        }

        let content = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ExtractError::Timeout(e.to_string())
            } else {
                ExtractError::FetchFailed(e.to_string())
            }
        })?;

        debug!(url = %url, content_length = content.len(), "Successfully fetched page");
        Ok(content)
    }
}
