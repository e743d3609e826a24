//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with a browser user agent
//! - GET requests for archive listing pages
//! - Retry with exponential backoff for any non-200 outcome
//! - Error classification for diagnostics

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The page came back with HTTP 200
    Success {
        /// Page body content
        body: String,
        /// Attempts used, including the successful one
        attempts: u32,
    },

    /// Every attempt failed
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// What went wrong on the final attempt
        last_error: String,
    },
}

/// How many times to try a page and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least one
    pub max_attempts: u32,

    /// Wait after the first failed attempt; doubles after each further failure
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_base_delay),
        )
    }

    /// Wait before the retry that follows 0-based `attempt`: `base * 2^attempt`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}

/// Why a single attempt did not produce a page
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptError {
    Status(u16),
    Timeout,
    Connect(String),
    Transport(String),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "status code: {}", code),
            Self::Timeout => f.write_str("request timeout"),
            Self::Connect(e) => write!(f, "connection failed: {}", e),
            Self::Transport(e) => write!(f, "request error: {}", e),
        }
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client is shared by every date worker; its idle pool is sized to the
/// worker count.
///
/// # Example
///
/// ```no_run
/// use archive_sweep::config::{CrawlerConfig, UserAgentConfig};
/// use archive_sweep::crawler::build_http_client;
///
/// let crawler = CrawlerConfig {
///     archive_url: "https://www.wsj.com".to_string(),
///     max_retries: 5,
///     retry_base_delay: 1000,
///     page_delay: 2000,
///     request_timeout: 10,
///     date_workers: 4,
///     crawl_timeout: None,
/// };
///
/// let client = build_http_client(&UserAgentConfig::default(), &crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(crawler.request_timeout);

    Client::builder()
        .user_agent(user_agent.browser.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .pool_max_idle_per_host(crawler.date_workers as usize)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page, retrying until it returns HTTP 200 or attempts run out
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 200 | Return the body |
/// | Any other status | Retry |
/// | Timeout / connect / DNS / body read error | Retry |
///
/// After failed attempt `k` (0-based) the fetcher waits `base * 2^k`; there is
/// no wait after the last attempt. This function never returns an error: an
/// exhausted budget is reported as [`FetchResult::Exhausted`].
pub async fn fetch_page(client: &Client, url: &str, policy: &RetryPolicy) -> FetchResult {
    let mut last_error = String::new();

    for attempt in 0..policy.max_attempts {
        match fetch_once(client, url).await {
            Ok(body) => {
                return FetchResult::Success {
                    body,
                    attempts: attempt + 1,
                };
            }
            Err(e) => {
                tracing::warn!("Attempt {}: failed to fetch {}, {}", attempt + 1, url, e);
                last_error = e.to_string();
            }
        }

        if attempt + 1 < policy.max_attempts {
            let delay = policy.delay_after(attempt);
            tracing::info!("Waiting {:?} before next attempt at {}", delay, url);
            tokio::time::sleep(delay).await;
        }
    }

    FetchResult::Exhausted {
        attempts: policy.max_attempts,
        last_error,
    }
}

/// One GET, succeeding only on exactly HTTP 200
async fn fetch_once(client: &Client, url: &str) -> Result<String, AttemptError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if status != StatusCode::OK {
        return Err(AttemptError::Status(status.as_u16()));
    }

    Ok(response.text().await?)
}
