//! Scheduler for running date crawls on a bounded worker pool
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore (one permit per date in flight)
//! - Collecting per-date outcomes over a single result channel
//! - Restoring date order, since dates finish in any order
//! - Skipping dates that had not started when the crawl was cancelled

use crate::crawler::date::DateCrawler;
use crate::state::DateOutcome;
use crate::ArchiveError;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

/// Runs a [`DateCrawler`] over many dates with at most `workers` in flight
///
/// With one worker the dates are crawled strictly one after another.
pub struct Scheduler {
    crawler: DateCrawler,
    workers: usize,
}

impl Scheduler {
    pub fn new(crawler: DateCrawler, workers: usize) -> Self {
        Self {
            crawler,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Crawls every date and returns the outcomes in the order given
    ///
    /// Dates still waiting for a permit when `cancel` fires are reported as
    /// not started. A worker task that panics fails the whole run, since its
    /// date's results are lost.
    pub async fn run(
        &self,
        dates: &[NaiveDate],
        cancel: &CancellationToken,
    ) -> Result<Vec<DateOutcome>, ArchiveError> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let (results_tx, mut results_rx) = mpsc::unbounded_channel::<(usize, DateOutcome)>();
        let mut handles = Vec::with_capacity(dates.len());

        for (index, &date) in dates.iter().enumerate() {
            let crawler = self.crawler.clone();
            let semaphore = Arc::clone(&semaphore);
            let results_tx = results_tx.clone();
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                let permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    permit = semaphore.acquire_owned() => permit.ok(),
                };

                let outcome = match permit {
                    Some(_permit) => crawler.crawl_date(date, &cancel).await,
                    None => {
                        tracing::debug!("Skipping {}: crawl cancelled before it started", date);
                        DateOutcome::not_started(date)
                    }
                };

                // The receiver lives until every sender is gone
                let _ = results_tx.send((index, outcome));
            }));
        }

        // Drop the original sender so the channel closes when all workers finish
        drop(results_tx);

        let mut slots: Vec<Option<DateOutcome>> = std::iter::repeat_with(|| None)
            .take(dates.len())
            .collect();
        while let Some((index, outcome)) = results_rx.recv().await {
            slots[index] = Some(outcome);
        }

        for handle in handles {
            handle
                .await
                .map_err(|e| ArchiveError::Worker(e.to_string()))?;
        }

        slots
            .into_iter()
            .zip(dates)
            .map(|(slot, date)| {
                slot.ok_or_else(|| ArchiveError::Worker(format!("no result for {}", date)))
            })
            .collect()
    }
}
