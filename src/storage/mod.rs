//! Storage module for persisting crawl results
//!
//! This module holds the records a crawl produces and the sink that commits
//! them:
//! - `ArticleRecord` / `Category`: one retained article
//! - `FailedFetch`: a page URL that ran out of retries
//! - `DatasetSink` / `CsvDatasetWriter`: the single end-of-crawl commit

mod category;
mod csv_writer;
mod traits;

pub use category::Category;
pub use csv_writer::{CsvDatasetWriter, COLUMNS};
pub use traits::{DatasetSink, StorageError, StorageResult};

use chrono::NaiveDate;

/// One article extracted from an archive listing page
///
/// Created once by the page parser and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Date of the listing page the article appeared on
    pub date: NaiveDate,

    /// Headline text; may be empty when the markup is malformed
    pub title: String,

    pub category: Category,

    /// Link as found on the page (absolute or relative), or `"Unknown"`
    pub url: String,
}

impl ArticleRecord {
    /// Placeholder URL for a headline element without an `href`
    pub const UNKNOWN_URL: &'static str = "Unknown";
}

/// A page URL whose fetch exhausted its retry budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFetch {
    pub url: String,

    /// Attempts made before giving up
    pub attempts: u32,

    /// Status or transport error from the final attempt
    pub last_error: String,
}
