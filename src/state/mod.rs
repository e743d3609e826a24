//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlWindow`: the validated inclusive date range of a crawl
//! - `PageCursor`: per-date page counter and accumulators, owned by one date crawl
//! - `DateOutcome` / `DateTermination`: what a finished date produced and why it stopped

mod page_cursor;
mod window;

// Re-export main types
pub use page_cursor::{DateOutcome, DateTermination, PageCursor};
pub use window::CrawlWindow;
