use crate::storage::{ArticleRecord, FailedFetch};
use chrono::NaiveDate;
use std::fmt;

/// Why a date crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTermination {
    /// A page came back with no headlines: the natural end of the listing
    Exhausted,

    /// A page fetch ran out of retries; later pages were not attempted
    FetchFailed,

    /// The crawl deadline passed (or the crawl was interrupted) mid-date
    Cancelled,
}

impl DateTermination {
    /// Returns true if the date may hold fewer articles than the archive does
    pub fn is_partial(&self) -> bool {
        !matches!(self, Self::Exhausted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::FetchFailed => "fetch_failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DateTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one date crawl produced
#[derive(Debug, Clone)]
pub struct DateOutcome {
    pub date: NaiveDate,

    /// Allow-listed articles, in page then document order
    pub articles: Vec<ArticleRecord>,

    /// Page URLs that exhausted their retries (at most one per date)
    pub failed_urls: Vec<FailedFetch>,

    /// Page count advertised by the first page's pagination controls
    pub max_pages: u32,

    /// Pages that were fetched and yielded headlines
    pub pages_crawled: u32,

    /// Headlines seen across all pages, retained or not
    pub headlines_seen: usize,

    /// The pagination probe of page 1 could not be fetched
    pub discovery_failed: bool,

    pub termination: DateTermination,
}

impl DateOutcome {
    /// Outcome for a date the crawl never started
    pub fn not_started(date: NaiveDate) -> Self {
        PageCursor::new(date).finish(DateTermination::Cancelled)
    }
}

/// Transient per-date crawl state
///
/// Owned by exactly one date crawl and consumed when the date finishes.
#[derive(Debug)]
pub struct PageCursor {
    date: NaiveDate,
    page: u32,
    max_pages: u32,
    pages_crawled: u32,
    headlines_seen: usize,
    discovery_failed: bool,
    articles: Vec<ArticleRecord>,
    failed_urls: Vec<FailedFetch>,
}

impl PageCursor {
    /// Starts at page 1 with a single assumed page
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            page: 1,
            max_pages: 1,
            pages_crawled: 0,
            headlines_seen: 0,
            discovery_failed: false,
            articles: Vec::new(),
            failed_urls: Vec::new(),
        }
    }

    /// Current 1-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Records the page count found on page 1
    pub fn set_max_pages(&mut self, max_pages: u32) {
        self.max_pages = max_pages.max(1);
    }

    /// Notes that the pagination probe failed; the page count stays at 1
    pub fn mark_discovery_failed(&mut self) {
        self.discovery_failed = true;
    }

    /// Returns true once the counter has moved past the advertised page count
    pub fn beyond_discovered(&self) -> bool {
        self.page > self.max_pages
    }

    /// Accepts one page's retained articles and advances to the next page
    pub fn record_page(&mut self, headlines: usize, articles: Vec<ArticleRecord>) {
        self.headlines_seen += headlines;
        self.articles.extend(articles);
        self.pages_crawled += 1;
        self.page += 1;
    }

    /// Ends the date on a page whose retries ran out
    pub fn fail(mut self, failed: FailedFetch) -> DateOutcome {
        self.failed_urls.push(failed);
        self.finish(DateTermination::FetchFailed)
    }

    pub fn finish(self, termination: DateTermination) -> DateOutcome {
        DateOutcome {
            date: self.date,
            articles: self.articles,
            failed_urls: self.failed_urls,
            max_pages: self.max_pages,
            pages_crawled: self.pages_crawled,
            headlines_seen: self.headlines_seen,
            discovery_failed: self.discovery_failed,
            termination,
        }
    }
}
