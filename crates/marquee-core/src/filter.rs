use marquee_models::{FilterBy, Movie, SortBy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Search text, filter mode and sort mode of the browsing view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filter: FilterBy,
    #[serde(default)]
    pub sort: SortBy,
}

impl ViewQuery {
    pub fn new(search: impl Into<String>, filter: FilterBy, sort: SortBy) -> Self {
        Self {
            search: search.into(),
            filter,
            sort,
        }
    }

    /// True when search or filter can hide movies from the collection
    pub fn is_narrowed(&self) -> bool {
        !self.search.is_empty() || self.filter != FilterBy::All
    }
}

/// Visible, ordered subset of `movies` for `query`.
///
/// Search is applied first, then the filter, then a stable sort, so movies
/// that compare equal keep their collection order.
pub fn project(movies: &[Movie], query: &ViewQuery) -> Vec<Movie> {
    let needle = query.search.to_lowercase();

    let mut visible: Vec<Movie> = movies
        .iter()
        .filter(|m| matches_search(m, &needle))
        .filter(|m| passes_filter(m, query.filter))
        .cloned()
        .collect();

    visible.sort_by(|a, b| compare(a, b, query.sort));
    visible
}

/// Case-insensitive substring match on title, any genre, language or country.
/// `needle` must already be lowercased; an empty needle matches everything.
pub fn matches_search(movie: &Movie, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    movie.title.to_lowercase().contains(needle)
        || movie
            .genres
            .iter()
            .any(|genre| genre.to_lowercase().contains(needle))
        || movie.language.to_lowercase().contains(needle)
        || movie.country.to_lowercase().contains(needle)
}

pub fn passes_filter(movie: &Movie, filter: FilterBy) -> bool {
    match filter {
        FilterBy::All => true,
        FilterBy::Watched => movie.watched,
        FilterBy::Unwatched => !movie.watched,
        FilterBy::Favorites => movie.favorite,
    }
}

pub fn compare(a: &Movie, b: &Movie, sort: SortBy) -> Ordering {
    match sort {
        SortBy::YearDesc => b.year.cmp(&a.year),
        SortBy::YearAsc => a.year.cmp(&b.year),
        // Flagged movies first, newest year first within each group
        SortBy::Favorites => b.favorite.cmp(&a.favorite).then_with(|| b.year.cmp(&a.year)),
        SortBy::Watched => b.watched.cmp(&a.watched).then_with(|| b.year.cmp(&a.year)),
    }
}

#[cfg(test)]
mod tests;
