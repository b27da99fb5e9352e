use super::AppContext;
use crate::output::{new_table, Output};
use color_eyre::eyre::Context;
use color_eyre::Result;
use comfy_table::Cell;
use marquee_core::stats::format_date;
use marquee_core::{CoreError, MovieRepository, ReviewRepository, ValidationError};
use marquee_models::{Movie, Review};
use owo_colors::OwoColorize;
use serde::Serialize;

pub const SPOILER_PLACEHOLDER: &str = "[spoiler hidden, use --reveal-spoilers]";

#[derive(Serialize)]
struct MovieDetail<'a> {
    movie: &'a Movie,
    reviews: Vec<ShownReview<'a>>,
}

#[derive(Serialize)]
struct ShownReview<'a> {
    id: &'a str,
    spoiler: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    created_at: String,
}

pub async fn run_show(ctx: &AppContext, id: &str, reveal_spoilers: bool, output: &Output) -> Result<()> {
    let mut movies = MovieRepository::new(ctx.store.clone());
    movies.fetch_all().await.wrap_err("Could not load the catalog")?;
    let movie = movies
        .get(id)
        .cloned()
        .ok_or_else(|| CoreError::from(ValidationError::UnknownMovie(id.to_string())))?;

    let mut reviews = ReviewRepository::new(ctx.store.clone());
    let list = reviews
        .fetch_for_movie(&movie.id)
        .await
        .wrap_err_with(|| format!("Could not load reviews for {}", movie.title))?;

    let date_format = &ctx.config.dashboard.date_format;
    let shown: Vec<ShownReview> = list
        .iter()
        .map(|r| shown_review(r, reveal_spoilers, date_format))
        .collect();

    if output.is_human() {
        render_detail(&movie, &shown, output);
    } else {
        output.data(&MovieDetail {
            movie: &movie,
            reviews: shown,
        })?;
    }
    Ok(())
}

/// Spoiler-tagged text is withheld unless revealed
fn shown_review<'a>(review: &'a Review, reveal: bool, date_format: &str) -> ShownReview<'a> {
    ShownReview {
        id: &review.id,
        spoiler: review.spoiler,
        text: (!review.spoiler || reveal).then_some(review.text.as_str()),
        created_at: format_date(&review.created_at, date_format),
    }
}

fn render_detail(movie: &Movie, reviews: &[ShownReview], output: &Output) {
    output.println(format!("\n{} ({})", movie.title.bright_cyan().bold(), movie.year));

    let mut table = new_table();
    let rows = [
        ("Director", movie.director.clone()),
        ("Cast", movie.cast_members.join(", ")),
        ("Genres", movie.genres.join(", ")),
        ("Country", movie.country.clone()),
        ("Language", movie.language.clone()),
        ("Poster", movie.poster.clone()),
        ("Watched", if movie.watched { "✓" } else { "✗" }.to_string()),
        ("Favorite", if movie.favorite { "★" } else { "☆" }.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(comfy_table::Attribute::Bold), Cell::new(value)]);
    }
    output.table(&table);
    output.println(format!("\n{}\n", movie.synopsis));

    if reviews.is_empty() {
        output.println("No reviews yet".bright_black().to_string());
        return;
    }

    output.println(format!("{}", "Reviews".bold()));
    for review in reviews {
        let text = review.text.unwrap_or(SPOILER_PLACEHOLDER);
        let tag = if review.spoiler { " [spoiler]".yellow().to_string() } else { String::new() };
        output.println(format!("  {}{}  {}", review.created_at.bright_black(), tag, text));
    }
}
