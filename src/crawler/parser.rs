//! HTML parser for archive listing pages
//!
//! This module extracts article records from one listing page:
//! - Headline links give the title and URL
//! - Category labels are paired with headlines by index
//! - Only allow-listed categories are kept

use crate::config::{compile_selector, SelectorConfig};
use crate::storage::{ArticleRecord, Category};
use crate::ConfigError;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

/// Compiled selectors for the listing markup
#[derive(Debug, Clone)]
pub struct PageSelectors {
    pub headline: Selector,
    pub category: Selector,
    pub pagination: Selector,
}

impl PageSelectors {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            headline: compile_selector(&config.headline)?,
            category: compile_selector(&config.category)?,
            pagination: compile_selector(&config.pagination)?,
        })
    }
}

/// Articles extracted from one page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Headline links on the page, retained or not
    pub headline_count: usize,

    /// Allow-listed articles in document order
    pub articles: Vec<ArticleRecord>,
}

impl ParsedPage {
    /// A page without headlines marks the end of a date's listing
    pub fn is_empty(&self) -> bool {
        self.headline_count == 0
    }
}

/// Parses listing HTML and extracts allow-listed articles
///
/// # Pairing Rules
///
/// - Headline `i` takes category label `i`; when there are fewer labels than
///   headlines the tail gets `"Unknown"` and is dropped by the allow-list
/// - A headline without `href` keeps the URL `"Unknown"`
/// - An empty title is kept as-is
///
/// # Example
///
/// ```
/// use archive_sweep::config::SelectorConfig;
/// use archive_sweep::crawler::{parse_articles, PageSelectors};
/// use chrono::NaiveDate;
///
/// let selectors = PageSelectors::from_config(&SelectorConfig {
///     headline: "h2 a".to_string(),
///     category: ".kind".to_string(),
///     pagination: ".pages a".to_string(),
/// })
/// .unwrap();
/// let html = r#"<article><span class="kind">U.S. Markets</span><h2><a href="/a">Stocks Rise</a></h2></article>"#;
/// let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
///
/// let page = parse_articles(html, date, &selectors);
/// assert_eq!(page.headline_count, 1);
/// assert_eq!(page.articles[0].title, "Stocks Rise");
/// ```
pub fn parse_articles(html: &str, date: NaiveDate, selectors: &PageSelectors) -> ParsedPage {
    let document = Html::parse_document(html);
    parse_document(&document, date, selectors)
}

/// Same as [`parse_articles`] for an already parsed document
pub fn parse_document(document: &Html, date: NaiveDate, selectors: &PageSelectors) -> ParsedPage {
    let headlines: Vec<ElementRef> = document.select(&selectors.headline).collect();
    let categories: Vec<Category> = document
        .select(&selectors.category)
        .map(|element| Category::parse(&stripped_text(element)))
        .collect();

    let articles = headlines
        .iter()
        .enumerate()
        .filter_map(|(i, headline)| {
            let category = categories.get(i).cloned().unwrap_or_else(Category::unknown);
            if !category.is_allowed() {
                return None;
            }

            let url = headline
                .value()
                .attr("href")
                .unwrap_or(ArticleRecord::UNKNOWN_URL)
                .to_string();

            Some(ArticleRecord {
                date,
                title: stripped_text(*headline),
                category,
                url,
            })
        })
        .collect();

    ParsedPage {
        headline_count: headlines.len(),
        articles,
    }
}

/// Concatenates the element's text nodes, each trimmed, empty ones skipped
fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
