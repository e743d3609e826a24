//! CSV dataset writer
//!
//! Writes the merged article list as `Date,Title,Category,URL` rows. The file
//! is assembled in a temporary file inside the destination directory and
//! renamed into place once complete, so readers never observe a half-written
//! dataset.

use crate::config::OutputConfig;
use crate::state::CrawlWindow;
use crate::storage::traits::{DatasetSink, StorageError, StorageResult};
use crate::storage::ArticleRecord;
use crate::url::archive_date_path;
use serde::Serialize;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Column names consumed by the annotation tooling
pub const COLUMNS: [&str; 4] = ["Date", "Title", "Category", "URL"];

#[derive(Serialize)]
struct ArticleRow<'a> {
    date: String,
    title: &'a str,
    category: &'a str,
    url: &'a str,
}

impl<'a> From<&'a ArticleRecord> for ArticleRow<'a> {
    fn from(article: &'a ArticleRecord) -> Self {
        Self {
            date: archive_date_path(article.date),
            title: &article.title,
            category: article.category.label(),
            url: &article.url,
        }
    }
}

/// Writes datasets as UTF-8 CSV files named after the crawl window
#[derive(Debug, Clone)]
pub struct CsvDatasetWriter {
    directory: PathBuf,
    file_prefix: String,
}

impl CsvDatasetWriter {
    pub fn new(directory: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: file_prefix.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.directory, &config.file_prefix)
    }
}

impl DatasetSink for CsvDatasetWriter {
    fn destination(&self, window: &CrawlWindow) -> PathBuf {
        self.directory.join(window.file_name(&self.file_prefix))
    }

    fn commit(&self, window: &CrawlWindow, articles: &[ArticleRecord]) -> StorageResult<PathBuf> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.destination(window);

        // Same directory as the target so the final rename stays on one filesystem
        let temp = NamedTempFile::new_in(&self.directory)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(temp);

        writer.write_record(COLUMNS)?;
        for article in articles {
            writer.serialize(ArticleRow::from(article))?;
        }

        let temp = writer
            .into_inner()
            .map_err(|e| StorageError::Io(e.into_error()))?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| StorageError::Persist {
            path: path.clone(),
            source: e.error,
        })?;

        tracing::debug!("Committed {} rows to {}", articles.len(), path.display());
        Ok(path)
    }
}
