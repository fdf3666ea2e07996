//! HTTP fetcher
//!
//! Builds the shared HTTP client and performs single-URL GETs with optional
//! bounded retry. The client is constructed once per driver invocation and
//! handed down explicitly; there is no process-global client.

use crate::config::CrawlerConfig;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;

/// Retry behavior for a single fetch
///
/// The default (`retries = 0`) performs exactly one attempt. When retries
/// are enabled, only transient failures (timeouts, 5xx, 429) are retried,
/// with exponential backoff starting at `base_delay`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self {
            retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before the given retry attempt (0-based), doubling each time.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl From<&CrawlerConfig> for RetryPolicy {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            retries: config.retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }
}

/// Builds the HTTP client shared by all fetches in a run
///
/// Redirects are followed transparently (reqwest's default policy), and
/// compressed responses are decoded in place.
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the response body as text
///
/// One GET per attempt; any 2xx status yields the full body. Non-2xx
/// statuses, timeouts, and network failures are classified into
/// [`FetchError`] so the caller can decide whether the failure is fatal
/// or skippable.
pub async fn fetch(client: &Client, url: &str, retry: &RetryPolicy) -> Result<String, FetchError> {
    let mut attempt = 0;
    loop {
        match fetch_once(client, url).await {
            Ok(body) => return Ok(body),
            Err(err) if attempt < retry.retries && err.is_retryable() => {
                let delay = retry.backoff(attempt);
                tracing::debug!(
                    "Retrying {} after {:?} (attempt {}/{}): {}",
                    url,
                    delay,
                    attempt + 1,
                    retry.retries,
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn fetch_once(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify(url, e))
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}
