//! Pagination discovery
//!
//! Reads the page-number links on the first listing page of a date. The count
//! is advisory: the date crawl stops on an empty page regardless, so every
//! parse problem falls back to a single page instead of failing.

use crate::crawler::parser::PageSelectors;
use scraper::Html;

/// Page count assumed when pagination controls are missing or unreadable
pub const DEFAULT_MAX_PAGES: u32 = 1;

/// Returns the largest page number among the pagination links
///
/// Link text is trimmed; anything that is not all ASCII digits (e.g. "Next",
/// "…") is ignored. The result is never below [`DEFAULT_MAX_PAGES`].
pub fn discover_max_pages(document: &Html, selectors: &PageSelectors) -> u32 {
    document
        .select(&selectors.pagination)
        .filter_map(|link| {
            let text: String = link.text().collect();
            let text = text.trim();
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            text.parse::<u32>().ok()
        })
        .max()
        .unwrap_or(DEFAULT_MAX_PAGES)
        .max(DEFAULT_MAX_PAGES)
}

/// Convenience wrapper that parses the HTML first
pub fn discover_max_pages_html(html: &str, selectors: &PageSelectors) -> u32 {
    discover_max_pages(&Html::parse_document(html), selectors)
}
