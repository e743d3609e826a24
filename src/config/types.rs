use chrono::NaiveDate;
use serde::Deserialize;

/// Browser identification sent when no `[user-agent]` section is given.
/// The archive host rejects requests that do not look like a browser.
pub const DEFAULT_BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Main configuration structure for Archive-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub window: Option<WindowConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Scheme and host of the archive (e.g. `https://www.wsj.com`)
    #[serde(rename = "archive-url")]
    pub archive_url: String,

    /// Total attempts per page fetch
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff unit in milliseconds; the wait after attempt `k` is `unit * 2^k`
    #[serde(rename = "retry-base-delay", default = "default_retry_base_delay")]
    pub retry_base_delay: u64,

    /// Pause between consecutive pages of one date (milliseconds)
    #[serde(rename = "page-delay", default = "default_page_delay")]
    pub page_delay: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Number of dates crawled concurrently
    #[serde(rename = "date-workers", default = "default_date_workers")]
    pub date_workers: u32,

    /// Overall crawl deadline (seconds)
    #[serde(rename = "crawl-timeout", default)]
    pub crawl_timeout: Option<u64>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(default = "default_browser")]
    pub browser: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            browser: default_browser(),
        }
    }
}

/// CSS selectors for the archive listing markup
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Headline link elements, one per article
    #[serde(default = "default_headline_selector")]
    pub headline: String,

    /// Category label elements, matched to headlines by index
    #[serde(default = "default_category_selector")]
    pub category: String,

    /// Pagination control links on the first page
    #[serde(default = "default_pagination_selector")]
    pub pagination: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            headline: default_headline_selector(),
            category: default_category_selector(),
            pagination: default_pagination_selector(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the dataset file is written into
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// File name prefix, followed by `_<start>_<end>.csv`
    #[serde(rename = "file-prefix", default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            file_prefix: default_file_prefix(),
        }
    }
}

/// Inclusive date range to crawl
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WindowConfig {
    #[serde(rename = "start-date")]
    pub start_date: NaiveDate,

    #[serde(rename = "end-date")]
    pub end_date: NaiveDate,
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_base_delay() -> u64 {
    1000
}

fn default_page_delay() -> u64 {
    2000
}

fn default_request_timeout() -> u64 {
    10
}

fn default_date_workers() -> u32 {
    4
}

fn default_browser() -> String {
    DEFAULT_BROWSER_AGENT.to_string()
}

fn default_headline_selector() -> String {
    ".WSJTheme--headline--unZqjb45 a".to_string()
}

fn default_category_selector() -> String {
    ".WSJTheme--articleType--34Gt-vdG".to_string()
}

fn default_pagination_selector() -> String {
    ".WSJTheme--pagination--1jWoU_y9 a".to_string()
}

fn default_output_directory() -> String {
    "data/raw".to_string()
}

fn default_file_prefix() -> String {
    "wsj_US_econ_articles".to_string()
}
