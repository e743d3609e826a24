use crate::config::WindowConfig;
use crate::ArchiveError;
use chrono::NaiveDate;
use std::fmt;

/// Inclusive range of calendar dates driving one archive crawl
///
/// A window can only be built through [`CrawlWindow::new`], so holding one
/// guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrawlWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl CrawlWindow {
    /// Creates a window, rejecting an inverted range
    ///
    /// # Examples
    ///
    /// ```
    /// use archive_sweep::CrawlWindow;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
    /// let window = CrawlWindow::new(start, end).unwrap();
    /// assert_eq!(window.days(), 4);
    /// assert!(CrawlWindow::new(end, start).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ArchiveError> {
        if start > end {
            return Err(ArchiveError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the window, both ends included
    pub fn days(&self) -> usize {
        // start <= end, so the difference is never negative
        (self.end - self.start).num_days() as usize + 1
    }

    /// Every date in the window, ascending
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days())
    }

    /// Picks the window for a run
    ///
    /// An explicit date wins over the matching `[window]` key. Only the
    /// combined result is checked, so a bad configured window is harmless
    /// when both dates are given explicitly. Returns `Ok(None)` when either
    /// end is missing from both sources.
    pub fn resolve(
        configured: Option<WindowConfig>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<Self>, ArchiveError> {
        let start = start.or(configured.map(|w| w.start_date));
        let end = end.or(configured.map(|w| w.end_date));

        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            _ => Ok(None),
        }
    }

    /// Dataset file name for this window: `<prefix>_<YYYYMMDD>_<YYYYMMDD>.csv`
    pub fn file_name(&self, prefix: &str) -> String {
        format!(
            "{}_{}_{}.csv",
            prefix,
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d")
        )
    }
}

impl fmt::Display for CrawlWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
