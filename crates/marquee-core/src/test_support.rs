use chrono::{DateTime, Duration, TimeZone, Utc};
use marquee_models::{Movie, Review};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Movie with placeholder metadata; `age` orders creation (higher = older)
pub fn movie(id: &str, title: &str, year: i32, age: i64) -> Movie {
    Movie {
        id: id.to_string(),
        title: title.to_string(),
        year,
        poster: format!("https://example.com/{}.jpg", id),
        genres: vec!["Drama".to_string()],
        director: "Unnamed Director".to_string(),
        cast_members: vec!["Unnamed Actor".to_string()],
        country: "France".to_string(),
        language: "French".to_string(),
        synopsis: "Synopsis.".to_string(),
        watched: false,
        favorite: false,
        created_at: base_time() - Duration::days(age),
    }
}

pub fn flagged(mut movie: Movie, watched: bool, favorite: bool) -> Movie {
    movie.watched = watched;
    movie.favorite = favorite;
    movie
}

pub fn review(id: &str, movie_id: &str, text: &str, age_minutes: i64) -> Review {
    Review {
        id: id.to_string(),
        movie_id: movie_id.to_string(),
        text: text.to_string(),
        spoiler: false,
        created_at: base_time() - Duration::minutes(age_minutes),
    }
}

pub fn ids(movies: &[Movie]) -> Vec<&str> {
    movies.iter().map(|m| m.id.as_str()).collect()
}
