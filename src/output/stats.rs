//! End-of-crawl summary rendering
//!
//! This module turns a crawl outcome into the human-readable report printed
//! after the dataset is committed.

use crate::crawler::CrawlOutcome;
use crate::output::report::CrawlReport;
use crate::url::archive_date_path;
use std::fmt::Write;

/// Formats the summary for a finished crawl
pub fn format_summary(outcome: &CrawlOutcome) -> String {
    let report = outcome.report();
    let mut out = String::new();

    let _ = writeln!(out, "=== Archive Crawl Summary ===\n");
    let _ = writeln!(
        out,
        "Window: {} ({} days)",
        report.window,
        report.window.days()
    );
    let _ = writeln!(out, "Elapsed: {:.1}s\n", report.elapsed.as_secs_f64());

    write_dates(&mut out, report);

    match outcome {
        CrawlOutcome::Committed { dataset, .. } => {
            let _ = writeln!(out, "Data saved to {}", dataset.path.display());
            let _ = writeln!(out, "Total articles collected: {}", dataset.articles.len());
        }
        CrawlOutcome::Empty { .. } => {
            let _ = writeln!(out, "Warning: No articles were collected!");
        }
    }
    out.push('\n');

    if report.failed_urls.is_empty() {
        let _ = writeln!(out, "All URLs were successfully scraped.");
    } else {
        let _ = writeln!(out, "The following URLs failed after retrying:");
        for failed in &report.failed_urls {
            let _ = writeln!(
                out,
                "  {} ({} attempts, {})",
                failed.url, failed.attempts, failed.last_error
            );
        }
    }

    if report.cancelled {
        let _ = writeln!(
            out,
            "Crawl stopped early: {} of {} days incomplete",
            report.partial_dates(),
            report.dates.len()
        );
    }

    out
}

fn write_dates(out: &mut String, report: &CrawlReport) {
    if report.dates.is_empty() {
        return;
    }

    let _ = writeln!(out, "Per Day:");
    for day in &report.dates {
        let _ = write!(
            out,
            "  {}: {}/{} headlines kept ({} pages, advertised {}) {}",
            archive_date_path(day.date),
            day.articles,
            day.headlines_seen,
            day.pages_crawled,
            day.max_pages,
            day.termination
        );
        if day.discovery_failed {
            out.push_str(" [pagination probe failed]");
        }
        out.push('\n');
    }
    out.push('\n');
}

/// Prints the summary to stdout
pub fn print_summary(outcome: &CrawlOutcome) {
    print!("{}", format_summary(outcome));
}
