//! Storage traits and error types
//!
//! This module defines the trait interface for dataset sinks and
//! associated error types.

use crate::state::CrawlWindow;
use crate::storage::ArticleRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to move dataset into place at {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for a finished crawl's merged articles
///
/// A commit either lands the whole dataset or nothing: implementations must
/// not leave a partially written file at the destination.
pub trait DatasetSink: Send + Sync {
    /// Writes all articles for the window in one batch
    ///
    /// # Returns
    ///
    /// The location the dataset was written to
    fn commit(&self, window: &CrawlWindow, articles: &[ArticleRecord]) -> StorageResult<PathBuf>;

    /// Where a commit for this window would land
    fn destination(&self, window: &CrawlWindow) -> PathBuf;
}
