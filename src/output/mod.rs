//! Output module for crawl reports
//!
//! This module handles:
//! - Collecting per-date bookkeeping into a `CrawlReport`
//! - Rendering the end-of-crawl summary (saved path, totals, failed URLs)

mod report;
pub mod stats;

pub use report::{CrawlReport, DateSummary};
pub use stats::{format_summary, print_summary};
