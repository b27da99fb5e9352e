use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub poster: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub director: String,
    #[serde(default)]
    pub cast_members: Vec<String>,
    pub country: String,
    pub language: String,
    pub synopsis: String,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl Movie {
    /// Editable metadata of this movie, as an admin form would be pre-filled.
    pub fn to_draft(&self) -> MovieDraft {
        MovieDraft {
            title: self.title.clone(),
            year: self.year,
            poster: self.poster.clone(),
            genres: self.genres.clone(),
            director: self.director.clone(),
            cast_members: self.cast_members.clone(),
            country: self.country.clone(),
            language: self.language.clone(),
            synopsis: self.synopsis.clone(),
        }
    }

    pub fn flag(&self, flag: MovieFlag) -> bool {
        match flag {
            MovieFlag::Watched => self.watched,
            MovieFlag::Favorite => self.favorite,
        }
    }

    pub fn set_flag(&mut self, flag: MovieFlag, value: bool) {
        match flag {
            MovieFlag::Watched => self.watched = value,
            MovieFlag::Favorite => self.favorite = value,
        }
    }
}

/// Metadata columns written by the admin add/edit forms.
/// Identity, flags and `created_at` are never part of a draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MovieDraft {
    pub title: String,
    pub year: i32,
    pub poster: String,
    pub genres: Vec<String>,
    pub director: String,
    pub cast_members: Vec<String>,
    pub country: String,
    pub language: String,
    pub synopsis: String,
}

/// The two user-mutable flags on a movie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MovieFlag {
    Watched,
    Favorite,
}

impl MovieFlag {
    /// Column name in the `movies` table
    pub fn column(&self) -> &'static str {
        match self {
            MovieFlag::Watched => "watched",
            MovieFlag::Favorite => "favorite",
        }
    }
}

/// Split a comma-separated form value ("Drama, Thriller,") into trimmed, non-empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" Drama,Thriller , ,Comedy,"),
            vec!["Drama".to_string(), "Thriller".to_string(), "Comedy".to_string()]
        );
        assert!(split_list("  ,  ").is_empty());
    }

    #[test]
    fn test_movie_deserializes_store_row() {
        let row = serde_json::json!({
            "id": "5b0c1f5e-1a2b-4c3d-9e8f-000000000001",
            "title": "Stalker",
            "year": 1979,
            "poster": "https://example.com/stalker.jpg",
            "genres": ["Drama", "Sci-Fi"],
            "director": "Andrei Tarkovsky",
            "cast_members": ["Alisa Freyndlikh"],
            "country": "USSR",
            "language": "Russian",
            "synopsis": "A guide leads two men into the Zone.",
            "watched": true,
            "favorite": false,
            "created_at": "2024-03-01T10:15:00.123456+00:00"
        });

        let movie: Movie = serde_json::from_value(row).unwrap();
        assert_eq!(movie.year, 1979);
        assert!(movie.watched);
        assert!(!movie.favorite);
        assert_eq!(movie.genres.len(), 2);
    }

    #[test]
    fn test_set_flag() {
        let mut movie: Movie = serde_json::from_value(serde_json::json!({
            "id": "m1", "title": "A", "year": 2020, "poster": "", "director": "",
            "country": "", "language": "", "synopsis": "",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(!movie.flag(MovieFlag::Favorite));
        movie.set_flag(MovieFlag::Favorite, true);
        assert!(movie.favorite);
        assert!(!movie.watched);
    }
}
