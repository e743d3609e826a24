//! URL handling module for Archive-Sweep
//!
//! This module validates the configured archive host and builds the listing
//! page URLs the crawler requests.

use crate::ConfigError;
use chrono::NaiveDate;
use url::Url;

/// Path under the archive host where daily listings live
const ARCHIVE_PATH: &str = "news/archive";

/// Parses and checks the configured archive base URL
///
/// The base must be an absolute `http` or `https` URL with a host. Any query
/// or fragment is rejected since page URLs append their own query string.
///
/// # Examples
///
/// ```
/// use archive_sweep::url::parse_archive_base;
///
/// assert!(parse_archive_base("https://www.wsj.com").is_ok());
/// assert!(parse_archive_base("mailto:desk@example.com").is_err());
/// ```
pub fn parse_archive_base(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid archive_url '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "archive_url '{}' must use http or https",
            raw
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "archive_url '{}' has no host",
            raw
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "archive_url '{}' must not carry a query or fragment",
            raw
        )));
    }

    Ok(url)
}

/// Formats a date the way archive paths and dataset rows spell it (`YYYY/MM/DD`)
pub fn archive_date_path(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Builds the listing URL for one page of one date
///
/// # Examples
///
/// ```
/// use archive_sweep::url::{archive_page_url, parse_archive_base};
/// use chrono::NaiveDate;
///
/// let base = parse_archive_base("https://www.wsj.com/").unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// assert_eq!(
///     archive_page_url(&base, date, 2),
///     "https://www.wsj.com/news/archive/2024/01/05?page=2"
/// );
/// ```
pub fn archive_page_url(base: &Url, date: NaiveDate, page: u32) -> String {
    format!(
        "{}/{}/{}?page={}",
        base.as_str().trim_end_matches('/'),
        ARCHIVE_PATH,
        archive_date_path(date),
        page
    )
}
