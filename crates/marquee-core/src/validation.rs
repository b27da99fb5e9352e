use chrono::{Datelike, Utc};
use marquee_models::{Movie, MovieDraft};

use crate::error::ValidationError;

/// First year a film could plausibly have been made
pub const EARLIEST_YEAR: i32 = 1888;

/// How far ahead of today an announced release may be dated
pub const FUTURE_YEARS: i32 = 10;

/// Check an admin form and return it with text fields trimmed.
/// Every field is required; genres and cast need at least one entry.
pub fn validate_draft(draft: &MovieDraft) -> Result<MovieDraft, ValidationError> {
    let required = |value: &str, name: &'static str| -> Result<String, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(ValidationError::MissingField(name))
        } else {
            Ok(trimmed.to_string())
        }
    };
    let list = |values: &[String], name: &'static str| -> Result<Vec<String>, ValidationError> {
        let cleaned: Vec<String> = values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        if cleaned.is_empty() {
            Err(ValidationError::MissingField(name))
        } else {
            Ok(cleaned)
        }
    };

    let max = Utc::now().year() + FUTURE_YEARS;
    if draft.year < EARLIEST_YEAR || draft.year > max {
        return Err(ValidationError::InvalidYear {
            year: draft.year,
            min: EARLIEST_YEAR,
            max,
        });
    }

    Ok(MovieDraft {
        title: required(&draft.title, "title")?,
        year: draft.year,
        poster: required(&draft.poster, "poster")?,
        genres: list(&draft.genres, "genres")?,
        director: required(&draft.director, "director")?,
        cast_members: list(&draft.cast_members, "cast")?,
        country: required(&draft.country, "country")?,
        language: required(&draft.language, "language")?,
        synopsis: required(&draft.synopsis, "synopsis")?,
    })
}

/// Check a review submission and return the trimmed text to send.
pub fn validate_review(movie: &Movie, text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyReviewText);
    }
    if !movie.watched {
        return Err(ValidationError::MovieNotWatched {
            title: movie.title.clone(),
        });
    }
    Ok(trimmed.to_string())
}
