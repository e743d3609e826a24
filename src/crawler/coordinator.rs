//! Crawler coordinator - archive crawl orchestration logic
//!
//! This module contains the top-level crawl over a date window, including:
//! - Validating the configuration and building the shared HTTP client
//! - Dispatching dates to the worker pool
//! - Enforcing the optional overall deadline
//! - Merging per-date results in date order
//! - Committing the merged dataset once, then reporting failed URLs

use crate::config::{validate, Config};
use crate::crawler::date::DateCrawler;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::scheduler::Scheduler;
use crate::output::{CrawlReport, DateSummary};
use crate::state::{CrawlWindow, DateOutcome};
use crate::storage::{ArticleRecord, CsvDatasetWriter, DatasetSink};
use crate::ArchiveError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A committed dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the dataset was written
    pub path: PathBuf,

    /// Every retained article, in date then page then document order
    pub articles: Vec<ArticleRecord>,
}

/// Result of a complete archive crawl
#[derive(Debug)]
pub enum CrawlOutcome {
    /// Articles were found and written
    Committed {
        dataset: Dataset,
        report: CrawlReport,
    },

    /// No date produced a retained article; nothing was written
    Empty { report: CrawlReport },
}

impl CrawlOutcome {
    pub fn report(&self) -> &CrawlReport {
        match self {
            Self::Committed { report, .. } | Self::Empty { report } => report,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            Self::Committed { dataset, .. } => Some(dataset),
            Self::Empty { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Main archive crawl coordinator
pub struct Coordinator {
    config: Arc<Config>,
    scheduler: Scheduler,
    sink: Box<dyn DatasetSink>,
}

impl Coordinator {
    /// Creates a coordinator that writes CSV into the configured output directory
    pub fn new(config: Config) -> Result<Self, ArchiveError> {
        let sink = CsvDatasetWriter::from_config(&config.output);
        Self::with_sink(config, Box::new(sink))
    }

    /// Creates a coordinator with a custom dataset sink
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the client was built
    /// * `Err(ArchiveError)` - Invalid configuration or client setup failure
    pub fn with_sink(config: Config, sink: Box<dyn DatasetSink>) -> Result<Self, ArchiveError> {
        validate(&config)?;

        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let crawler = DateCrawler::from_config(&config, client)?;
        let scheduler = Scheduler::new(crawler, config.crawler.date_workers as usize);

        Ok(Self {
            config: Arc::new(config),
            scheduler,
            sink,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where a successful crawl of `window` will write its dataset
    pub fn destination(&self, window: &CrawlWindow) -> PathBuf {
        self.sink.destination(window)
    }

    /// Crawls every date in the window and commits the merged result
    pub async fn run(&self, window: &CrawlWindow) -> Result<CrawlOutcome, ArchiveError> {
        self.run_with_cancellation(window, CancellationToken::new())
            .await
    }

    /// Same as [`Coordinator::run`], stopping early when `cancel` fires
    ///
    /// Cancellation (from the caller or the configured deadline) abandons
    /// in-flight fetches. Whatever was gathered up to that point is still
    /// merged and committed.
    pub async fn run_with_cancellation(
        &self,
        window: &CrawlWindow,
        cancel: CancellationToken,
    ) -> Result<CrawlOutcome, ArchiveError> {
        let start_time = Instant::now();
        let cancel = cancel.child_token();
        let deadline = self
            .config
            .crawler
            .crawl_timeout
            .map(|secs| spawn_deadline(Duration::from_secs(secs), cancel.clone()));

        let dates: Vec<_> = window.dates().collect();
        tracing::info!(
            "Starting archive crawl of {} ({} days, {} workers)",
            window,
            dates.len(),
            self.scheduler.workers()
        );

        let outcomes = self.scheduler.run(&dates, &cancel).await;
        if let Some(deadline) = deadline {
            deadline.abort();
        }
        let outcomes = outcomes?;

        let (articles, report) = merge_outcomes(
            *window,
            outcomes,
            cancel.is_cancelled(),
            start_time.elapsed(),
        );

        if articles.is_empty() {
            tracing::warn!("No articles were collected for {}", window);
            log_failed_urls(&report);
            return Ok(CrawlOutcome::Empty { report });
        }

        let path = self.sink.commit(window, &articles)?;
        tracing::info!("Data saved to {}", path.display());
        tracing::info!("Total articles collected: {}", articles.len());
        log_failed_urls(&report);

        Ok(CrawlOutcome::Committed {
            dataset: Dataset { path, articles },
            report,
        })
    }
}

/// Cancels `token` once `timeout` elapses
fn spawn_deadline(timeout: Duration, token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        tracing::warn!(
            "Crawl deadline of {:?} reached; committing what has been collected",
            timeout
        );
        token.cancel();
    })
}

/// Concatenates per-date results, which must already be in date order
fn merge_outcomes(
    window: CrawlWindow,
    outcomes: Vec<DateOutcome>,
    cancelled: bool,
    elapsed: Duration,
) -> (Vec<ArticleRecord>, CrawlReport) {
    let mut articles = Vec::new();
    let mut failed_urls = Vec::new();
    let mut dates = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        dates.push(DateSummary::from(&outcome));
        articles.extend(outcome.articles);
        failed_urls.extend(outcome.failed_urls);
    }

    let report = CrawlReport {
        window,
        total_articles: articles.len(),
        failed_urls,
        dates,
        cancelled,
        elapsed,
    };

    (articles, report)
}

fn log_failed_urls(report: &CrawlReport) {
    if report.failed_urls.is_empty() {
        tracing::info!("All URLs were successfully scraped.");
        return;
    }

    tracing::warn!(
        "{} URLs failed after exhausting their retries:",
        report.failed_urls.len()
    );
    for failed in &report.failed_urls {
        tracing::warn!(
            "  {} ({} attempts, {})",
            failed.url,
            failed.attempts,
            failed.last_error
        );
    }
}

/// Runs a complete archive crawl for `[start, end]`
///
/// The window is checked before any client is built or request sent, so an
/// inverted range fails with [`ArchiveError::InvalidRange`] and no network
/// activity.
pub async fn crawl_archive(
    config: Config,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> Result<CrawlOutcome, ArchiveError> {
    let window = CrawlWindow::new(start, end)?;
    let coordinator = Coordinator::new(config)?;
    coordinator.run(&window).await
}
