use std::fmt;

/// Article category as labelled on the listing page
///
/// Only [`Category::UsEconomy`] and [`Category::UsMarkets`] survive the
/// allow-list; every other label, including the `"Unknown"` placeholder for
/// headlines without a matching label, lands in [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    UsEconomy,
    UsMarkets,
    Other(String),
}

impl Category {
    pub const US_ECONOMY_LABEL: &'static str = "U.S. Economy";
    pub const US_MARKETS_LABEL: &'static str = "U.S. Markets";
    pub const UNKNOWN_LABEL: &'static str = "Unknown";

    /// Parses a label scraped from the page
    ///
    /// Leading/trailing whitespace is dropped and internal whitespace runs
    /// collapse to one space. Matching is otherwise exact and case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use archive_sweep::Category;
    ///
    /// assert_eq!(Category::parse("  U.S.\n Economy "), Category::UsEconomy);
    /// assert!(!Category::parse("u.s. economy").is_allowed());
    /// ```
    pub fn parse(label: &str) -> Self {
        let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.as_str() {
            Self::US_ECONOMY_LABEL => Self::UsEconomy,
            Self::US_MARKETS_LABEL => Self::UsMarkets,
            _ => Self::Other(normalized),
        }
    }

    /// Placeholder for a headline with no category label at its index
    pub fn unknown() -> Self {
        Self::Other(Self::UNKNOWN_LABEL.to_string())
    }

    /// Returns true if articles with this category are kept
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::UsEconomy | Self::UsMarkets)
    }

    /// Label written to the dataset
    pub fn label(&self) -> &str {
        match self {
            Self::UsEconomy => Self::US_ECONOMY_LABEL,
            Self::UsMarkets => Self::US_MARKETS_LABEL,
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
