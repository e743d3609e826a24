//! Crawler module for archive listing pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with exponential-backoff retries
//! - Headline/category extraction and pagination discovery
//! - Per-date page walking
//! - Date scheduling on a bounded worker pool
//! - Overall crawl coordination and dataset commit

mod coordinator;
mod date;
mod fetcher;
mod pagination;
mod parser;
mod scheduler;

pub use coordinator::{crawl_archive, Coordinator, CrawlOutcome, Dataset};
pub use date::DateCrawler;
pub use fetcher::{build_http_client, fetch_page, FetchResult, RetryPolicy};
pub use pagination::{discover_max_pages, discover_max_pages_html, DEFAULT_MAX_PAGES};
pub use parser::{parse_articles, parse_document, PageSelectors, ParsedPage};
pub use scheduler::Scheduler;
