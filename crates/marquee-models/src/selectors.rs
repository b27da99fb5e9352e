use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Narrows the displayed movie set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FilterBy {
    #[default]
    All,
    Watched,
    Unwatched,
    Favorites,
}

/// Determines display order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    YearDesc,
    YearAsc,
    Favorites,
    Watched,
}

impl FilterBy {
    pub const ALL: [FilterBy; 4] = [
        FilterBy::All,
        FilterBy::Watched,
        FilterBy::Unwatched,
        FilterBy::Favorites,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterBy::All => "all",
            FilterBy::Watched => "watched",
            FilterBy::Unwatched => "unwatched",
            FilterBy::Favorites => "favorites",
        }
    }
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [
        SortBy::YearDesc,
        SortBy::YearAsc,
        SortBy::Favorites,
        SortBy::Watched,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::YearDesc => "year-desc",
            SortBy::YearAsc => "year-asc",
            SortBy::Favorites => "favorites",
            SortBy::Watched => "watched",
        }
    }
}

impl FromStr for FilterBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        FilterBy::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid filter: {}. Use 'all', 'watched', 'unwatched', or 'favorites'",
                    s
                )
            })
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        SortBy::ALL
            .into_iter()
            .find(|o| o.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid sort: {}. Use 'year-desc', 'year-asc', 'favorites', or 'watched'",
                    s
                )
            })
    }
}

impl fmt::Display for FilterBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
