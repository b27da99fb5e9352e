use super::progress::{is_interactive, Spinner};
use super::prompts;
use super::AppContext;
use crate::output::{new_table, review_label, truncate, Output};
use crate::MovieFields;
use color_eyre::eyre::Context;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use marquee_core::{load_catalog_stats, CoreError, MovieRepository, StatsOptions, ValidationError};
use marquee_models::{CatalogStats, MovieDraft};
use owo_colors::OwoColorize;

pub const DELETE_WARNING: &str = "All associated reviews will also be deleted.";

pub async fn run_dashboard(ctx: &AppContext, output: &Output) -> Result<()> {
    let spinner = Spinner::start("Loading catalog...");
    let stats = load_dashboard(ctx, &spinner).await;
    spinner.finish();
    let stats = stats?;

    if output.is_human() {
        render_dashboard(&stats, output);
    } else {
        output.data(&stats)?;
    }
    Ok(())
}

async fn load_dashboard(ctx: &AppContext, spinner: &Spinner) -> Result<CatalogStats> {
    let mut movies = MovieRepository::new(ctx.store.clone());
    movies.fetch_all().await.wrap_err("Could not load the catalog")?;

    spinner.set_message("Computing review statistics...");
    let options = StatsOptions::from_config(&ctx.config);
    let stats = load_catalog_stats(ctx.store.as_ref(), movies.movies(), &options)
        .await
        .wrap_err("Dashboard statistics are unavailable")?;
    Ok(stats)
}

fn render_dashboard(stats: &CatalogStats, output: &Output) {
    let mut totals = new_table();
    totals.set_header(vec![
        Cell::new("Movies").add_attribute(Attribute::Bold),
        Cell::new("Reviews").add_attribute(Attribute::Bold),
        Cell::new("Watched").add_attribute(Attribute::Bold),
        Cell::new("Favorites").add_attribute(Attribute::Bold),
    ]);
    totals.add_row(vec![
        Cell::new(stats.total_movies),
        Cell::new(stats.total_reviews),
        Cell::new(stats.watched_movies),
        Cell::new(stats.favorite_movies),
    ]);
    output.table(&totals);

    output.println(format!("\n{}", "Most reviewed".bright_cyan().bold()));
    if stats.top_rated_movies.is_empty() {
        output.println("  No reviews yet".bright_black().to_string());
    }
    for (rank, movie) in stats.top_rated_movies.iter().enumerate() {
        output.println(format!(
            "  {}. {} ({})",
            rank + 1,
            movie.title,
            review_label(movie.review_count)
        ));
    }

    output.println(format!("\n{}", "Recent reviews".bright_cyan().bold()));
    if stats.recent_reviews.is_empty() {
        output.println("  No reviews yet".bright_black().to_string());
    }
    for review in &stats.recent_reviews {
        output.println(format!(
            "  {}  {}: {}",
            review.date.bright_black(),
            review.movie_title.bold(),
            truncate(&review.text, 80)
        ));
    }
}

pub async fn run_list(ctx: &AppContext, output: &Output) -> Result<()> {
    let mut movies = MovieRepository::new(ctx.store.clone());
    let all = movies.fetch_all().await.wrap_err("Could not load the catalog")?;

    if !output.is_human() {
        output.data(&all)?;
        return Ok(());
    }
    if all.is_empty() {
        output.info("No movies available");
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Year").fg(Color::Cyan),
        Cell::new("Genres").fg(Color::Cyan),
        Cell::new("Director").fg(Color::Cyan),
    ]);
    for movie in all {
        table.add_row(vec![
            Cell::new(&movie.id),
            Cell::new(&movie.title),
            Cell::new(movie.year),
            Cell::new(genre_summary(&movie.genres)),
            Cell::new(&movie.director),
        ]);
    }
    output.table(&table);
    Ok(())
}

/// First two genres, then "+N" for the rest
pub fn genre_summary(genres: &[String]) -> String {
    let shown = genres.iter().take(2).cloned().collect::<Vec<_>>().join(", ");
    if genres.len() > 2 {
        format!("{} +{}", shown, genres.len() - 2)
    } else {
        shown
    }
}

pub async fn run_add(ctx: &AppContext, fields: MovieFields, output: &Output) -> Result<()> {
    let mut movies = MovieRepository::new(ctx.store.clone());
    let draft = fields.apply(MovieDraft::default());

    let created = movies.create(&draft).await.map_err(|e| report_validation(e, output))?;
    output.success(format!("Added {} ({})", created.title, created.id));

    let count = movies.fetch_all().await.wrap_err("Could not reload the catalog")?.len();
    output.println(format!("Catalog now holds {} movies", count));
    output.data(&created)?;
    Ok(())
}

pub async fn run_edit(ctx: &AppContext, id: &str, fields: MovieFields, output: &Output) -> Result<()> {
    let mut movies = MovieRepository::new(ctx.store.clone());
    movies.fetch_all().await.wrap_err("Could not load the catalog")?;
    let current = movies
        .get(id)
        .ok_or_else(|| CoreError::from(ValidationError::UnknownMovie(id.to_string())))?;

    let draft = fields.apply(current.to_draft());
    movies
        .update(id, &draft)
        .await
        .map_err(|e| report_validation(e, output))?;

    movies.fetch_all().await.wrap_err("Could not reload the catalog")?;
    if let Some(updated) = movies.get(id) {
        output.success(format!("Updated {}", updated.title));
        output.data(updated)?;
    }
    Ok(())
}

pub async fn run_delete(ctx: &AppContext, id: &str, yes: bool, output: &Output) -> Result<()> {
    let mut movies = MovieRepository::new(ctx.store.clone());
    movies.fetch_all().await.wrap_err("Could not load the catalog")?;
    let title = movies
        .get(id)
        .map(|m| m.title.clone())
        .ok_or_else(|| CoreError::from(ValidationError::UnknownMovie(id.to_string())))?;

    if !yes {
        if !is_interactive() {
            return Err(color_eyre::eyre::eyre!(
                "Refusing to delete {} without confirmation. Pass --yes to confirm.",
                title
            ));
        }
        let prompt = format!("Delete \"{}\"? {}", title, DELETE_WARNING);
        if !prompts::prompt_yes_no(&prompt, false)? {
            output.info("Cancelled");
            return Ok(());
        }
    }

    movies.delete(id).await.wrap_err_with(|| format!("Could not delete {}", title))?;
    output.success(format!("Deleted {}", title));

    let remaining = movies.fetch_all().await.wrap_err("Could not reload the catalog")?.len();
    output.println(format!("Catalog now holds {} movies", remaining));
    Ok(())
}

/// Validation problems are printed at the input before the error propagates
fn report_validation(err: CoreError, output: &Output) -> color_eyre::Report {
    if let CoreError::Validation(v) = &err {
        output.error(format!("Invalid movie: {}", v));
    }
    color_eyre::Report::new(err)
}
