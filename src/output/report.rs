//! Crawl report types
//!
//! A `CrawlReport` is built once all date outcomes are merged. It carries the
//! per-date bookkeeping and every failed page URL, which the crawl reports but
//! does not treat as fatal.

use crate::state::{CrawlWindow, DateOutcome, DateTermination};
use crate::storage::FailedFetch;
use chrono::NaiveDate;
use std::time::Duration;

/// Per-date counts kept after the date's articles are merged away
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSummary {
    pub date: NaiveDate,
    pub articles: usize,
    pub headlines_seen: usize,
    pub pages_crawled: u32,
    pub max_pages: u32,
    pub discovery_failed: bool,
    pub termination: DateTermination,
}

impl From<&DateOutcome> for DateSummary {
    fn from(outcome: &DateOutcome) -> Self {
        Self {
            date: outcome.date,
            articles: outcome.articles.len(),
            headlines_seen: outcome.headlines_seen,
            pages_crawled: outcome.pages_crawled,
            max_pages: outcome.max_pages,
            discovery_failed: outcome.discovery_failed,
            termination: outcome.termination,
        }
    }
}

/// Summary of a finished archive crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub window: CrawlWindow,

    /// Articles retained across the whole window
    pub total_articles: usize,

    /// Page URLs that exhausted their retries, in date order
    pub failed_urls: Vec<FailedFetch>,

    /// One entry per date in the window, ascending
    pub dates: Vec<DateSummary>,

    /// The crawl deadline passed (or the crawl was interrupted) before every date finished
    pub cancelled: bool,

    pub elapsed: Duration,
}

impl CrawlReport {
    /// Returns true if the dataset may be missing articles the archive has
    pub fn is_partial(&self) -> bool {
        self.cancelled || !self.failed_urls.is_empty()
    }

    /// Dates whose pagination probe failed
    pub fn discovery_failures(&self) -> impl Iterator<Item = &DateSummary> {
        self.dates.iter().filter(|d| d.discovery_failed)
    }

    /// Number of dates that ended early for any reason
    pub fn partial_dates(&self) -> usize {
        self.dates
            .iter()
            .filter(|d| d.termination.is_partial())
            .count()
    }
}
