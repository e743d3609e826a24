//! Date crawler
//!
//! Crawls every listing page of a single archive date:
//! 1. Fetch page 1 to read the pagination controls (failure here is tolerated)
//! 2. Fetch pages 1, 2, 3, ... until a page has no headlines or a fetch
//!    runs out of retries, keeping allow-listed articles along the way
//! 3. Return the accumulated articles and failed page URLs

use crate::config::Config;
use crate::crawler::fetcher::{fetch_page, FetchResult, RetryPolicy};
use crate::crawler::pagination::discover_max_pages_html;
use crate::crawler::parser::{parse_articles, PageSelectors};
use crate::state::{DateOutcome, DateTermination, PageCursor};
use crate::storage::FailedFetch;
use crate::url::{archive_date_path, archive_page_url, parse_archive_base};
use crate::ArchiveError;
use chrono::NaiveDate;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Crawls the pages of one date at a time
///
/// Cheap to clone: the client and selectors are shared, so each date worker
/// gets its own handle.
#[derive(Debug, Clone)]
pub struct DateCrawler {
    client: Client,
    base_url: Arc<Url>,
    selectors: Arc<PageSelectors>,
    policy: RetryPolicy,
    page_delay: Duration,
}

impl DateCrawler {
    pub fn new(
        client: Client,
        base_url: Url,
        selectors: PageSelectors,
        policy: RetryPolicy,
        page_delay: Duration,
    ) -> Self {
        Self {
            client,
            base_url: Arc::new(base_url),
            selectors: Arc::new(selectors),
            policy,
            page_delay,
        }
    }

    /// Builds a date crawler from configuration around an existing client
    pub fn from_config(config: &Config, client: Client) -> Result<Self, ArchiveError> {
        let base_url = parse_archive_base(&config.crawler.archive_url)?;
        let selectors = PageSelectors::from_config(&config.selectors)?;

        Ok(Self::new(
            client,
            base_url,
            selectors,
            RetryPolicy::from_config(&config.crawler),
            Duration::from_millis(config.crawler.page_delay),
        ))
    }

    /// Listing URL for one page of one date
    pub fn page_url(&self, date: NaiveDate, page: u32) -> String {
        archive_page_url(&self.base_url, date, page)
    }

    /// Crawls all pages of `date`
    ///
    /// Never fails: fetch problems end the date early and show up in the
    /// outcome's `failed_urls` and `termination`. When `cancel` fires the
    /// in-flight fetch is dropped and the articles gathered so far are kept.
    pub async fn crawl_date(&self, date: NaiveDate, cancel: &CancellationToken) -> DateOutcome {
        let outcome = self.crawl_pages(date, cancel).await;

        tracing::info!(
            "Day: {} finished ({}): {} articles from {} pages (advertised {})",
            archive_date_path(date),
            outcome.termination,
            outcome.articles.len(),
            outcome.pages_crawled,
            outcome.max_pages
        );

        outcome
    }

    async fn crawl_pages(&self, date: NaiveDate, cancel: &CancellationToken) -> DateOutcome {
        let mut cursor = PageCursor::new(date);

        // Discover: a failed probe leaves max_pages at 1 and the loop still runs
        let probe_url = self.page_url(date, 1);
        let probe = tokio::select! {
            biased;
            _ = cancel.cancelled() => return cursor.finish(DateTermination::Cancelled),
            result = fetch_page(&self.client, &probe_url, &self.policy) => result,
        };
        match probe {
            FetchResult::Success { body, .. } => {
                cursor.set_max_pages(discover_max_pages_html(&body, &self.selectors));
            }
            FetchResult::Exhausted {
                attempts,
                last_error,
            } => {
                tracing::warn!(
                    "Pagination discovery for {} failed after {} attempts ({}); assuming a single page",
                    archive_date_path(date),
                    attempts,
                    last_error
                );
                cursor.mark_discovery_failed();
            }
        }

        loop {
            let url = self.page_url(date, cursor.page());

            if cursor.beyond_discovered() {
                tracing::debug!(
                    "Page {} of {} is past the {} advertised by pagination",
                    cursor.page(),
                    archive_date_path(date),
                    cursor.max_pages()
                );
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return cursor.finish(DateTermination::Cancelled),
                result = fetch_page(&self.client, &url, &self.policy) => result,
            };

            let body = match result {
                FetchResult::Success { body, attempts, .. } => {
                    if attempts > 1 {
                        tracing::debug!("Fetched {} after {} attempts", url, attempts);
                    }
                    body
                }
                FetchResult::Exhausted {
                    attempts,
                    last_error,
                } => {
                    // A failed page ends the date; later pages are never requested
                    return cursor.fail(FailedFetch {
                        url,
                        attempts,
                        last_error,
                    });
                }
            };

            let parsed = parse_articles(&body, date, &self.selectors);
            if parsed.is_empty() {
                return cursor.finish(DateTermination::Exhausted);
            }

            tracing::debug!(
                "Day: {} | Page: {}/{} | Found: {}/{} articles",
                archive_date_path(date),
                cursor.page(),
                cursor.max_pages(),
                parsed.articles.len(),
                parsed.headline_count
            );
            cursor.record_page(parsed.headline_count, parsed.articles);

            if !self.page_delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return cursor.finish(DateTermination::Cancelled),
                    _ = tokio::time::sleep(self.page_delay) => {}
                }
            }
        }
    }
}
