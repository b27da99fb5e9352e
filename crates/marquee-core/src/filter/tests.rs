use super::*;
use crate::test_support::{flagged, ids, movie};

fn catalog() -> Vec<Movie> {
    let mut parasite = flagged(movie("m1", "Parasite", 2019, 1), true, true);
    parasite.genres = vec!["Thriller".to_string(), "Drama".to_string()];
    parasite.language = "Korean".to_string();
    parasite.country = "South Korea".to_string();

    let mut amelie = flagged(movie("m2", "Amélie", 2001, 2), false, true);
    amelie.genres = vec!["Romance".to_string(), "Comedy".to_string()];

    let mut heat = flagged(movie("m3", "Heat", 1995, 3), true, false);
    heat.genres = vec!["Crime".to_string()];
    heat.language = "English".to_string();
    heat.country = "USA".to_string();

    let mut mandarin = movie("m4", "Yi Yi", 2000, 4);
    mandarin.genres = vec!["Family".to_string()];
    mandarin.language = "Mandarin".to_string();
    mandarin.country = "Taiwan".to_string();

    let mut playtime = movie("m5", "Playtime", 1967, 5);
    playtime.genres = vec!["Comedy".to_string()];

    vec![parasite, amelie, heat, mandarin, playtime]
}

fn query(search: &str, filter: FilterBy, sort: SortBy) -> ViewQuery {
    ViewQuery::new(search, filter, sort)
}

#[test]
fn test_default_query_sorts_newest_year_first() {
    let movies = catalog();
    let out = project(&movies, &ViewQuery::default());
    assert_eq!(ids(&out), vec!["m1", "m2", "m4", "m3", "m5"]);
}

#[test]
fn test_watched_and_unwatched_partition_collection() {
    let movies = catalog();
    let watched = project(&movies, &query("", FilterBy::Watched, SortBy::YearDesc));
    let unwatched = project(&movies, &query("", FilterBy::Unwatched, SortBy::YearDesc));

    assert_eq!(watched.len() + unwatched.len(), movies.len());
    for m in &watched {
        assert!(m.watched);
        assert!(!unwatched.iter().any(|u| u.id == m.id));
    }
    for m in &movies {
        assert!(watched.iter().chain(unwatched.iter()).any(|x| x.id == m.id));
    }
}

#[test]
fn test_year_sorts_are_reverses_for_distinct_years() {
    let movies = catalog();
    let desc = project(&movies, &query("", FilterBy::All, SortBy::YearDesc));
    let mut asc = project(&movies, &query("", FilterBy::All, SortBy::YearAsc));
    asc.reverse();
    assert_eq!(desc, asc);
}

#[test]
fn test_favorites_sort_leads_with_favorite_block() {
    let movies = catalog();
    let out = project(&movies, &query("", FilterBy::All, SortBy::Favorites));

    let block = out.iter().take_while(|m| m.favorite).count();
    let favorites = movies.iter().filter(|m| m.favorite).count();
    assert_eq!(block, favorites);
    assert!(out[block..].iter().all(|m| !m.favorite));

    for group in [&out[..block], &out[block..]] {
        assert!(group.windows(2).all(|w| w[0].year >= w[1].year));
    }
}

#[test]
fn test_watched_sort_breaks_ties_by_year_desc() {
    let movies = catalog();
    let out = project(&movies, &query("", FilterBy::All, SortBy::Watched));
    assert_eq!(ids(&out), vec!["m1", "m3", "m2", "m4", "m5"]);
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let movies = catalog();

    let out = project(&movies, &query("dra", FilterBy::All, SortBy::YearDesc));
    assert!(out.iter().any(|m| m.id == "m1"));

    let out = project(&movies, &query("PARA", FilterBy::All, SortBy::YearDesc));
    assert_eq!(ids(&out), vec!["m1"]);

    let out = project(&movies, &query("mandarin", FilterBy::All, SortBy::YearDesc));
    assert_eq!(ids(&out), vec!["m4"]);

    let out = project(&movies, &query("taiw", FilterBy::All, SortBy::YearDesc));
    assert_eq!(ids(&out), vec!["m4"]);
}

#[test]
fn test_search_ignores_year_director_and_cast() {
    let mut movies = catalog();
    movies[0].director = "Bong Joon-ho".to_string();
    movies[0].cast_members = vec!["Song Kang-ho".to_string()];

    assert!(project(&movies, &query("2019", FilterBy::All, SortBy::YearDesc)).is_empty());
    assert!(project(&movies, &query("bong", FilterBy::All, SortBy::YearDesc)).is_empty());
    assert!(project(&movies, &query("kang-ho", FilterBy::All, SortBy::YearDesc)).is_empty());
}

#[test]
fn test_filter_applies_after_search() {
    let movies = catalog();
    let out = project(&movies, &query("comedy", FilterBy::Favorites, SortBy::YearDesc));
    assert_eq!(ids(&out), vec!["m2"]);
}

#[test]
fn test_two_movie_scenarios() {
    let a = flagged(movie("a", "A", 2020, 0), false, true);
    let b = flagged(movie("b", "B", 1999, 1), true, false);
    let movies = vec![a, b];

    let out = project(&movies, &query("", FilterBy::All, SortBy::Favorites));
    assert_eq!(ids(&out), vec!["a", "b"]);

    let out = project(&movies, &query("", FilterBy::Watched, SortBy::YearDesc));
    assert_eq!(ids(&out), vec!["b"]);

    assert!(project(&movies, &query("2020", FilterBy::All, SortBy::YearDesc)).is_empty());
}

#[test]
fn test_equal_years_keep_collection_order() {
    let movies = vec![
        movie("x", "X", 2010, 0),
        movie("y", "Y", 2010, 1),
        movie("z", "Z", 2010, 2),
    ];
    for sort in SortBy::ALL {
        let out = project(&movies, &query("", FilterBy::All, sort));
        assert_eq!(ids(&out), vec!["x", "y", "z"], "sort {}", sort);
    }
}

#[test]
fn test_project_is_idempotent_and_leaves_input_alone() {
    let movies = catalog();
    let before = movies.clone();
    let q = query("o", FilterBy::Unwatched, SortBy::YearAsc);

    let first = project(&movies, &q);
    let second = project(&movies, &q);
    assert_eq!(first, second);
    assert_eq!(movies, before);
}

#[test]
fn test_is_narrowed() {
    assert!(!ViewQuery::default().is_narrowed());
    assert!(query("x", FilterBy::All, SortBy::YearDesc).is_narrowed());
    assert!(query("", FilterBy::Favorites, SortBy::YearDesc).is_narrowed());
    assert!(!query("", FilterBy::All, SortBy::Watched).is_narrowed());
}
