use super::AppContext;
use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;
use marquee_core::{CoreError, MovieRepository, ReviewRepository, ValidationError};

pub async fn run_review(ctx: &AppContext, id: &str, text: &str, spoiler: bool, output: &Output) -> Result<()> {
    let mut movies = MovieRepository::new(ctx.store.clone());
    movies.fetch_all().await.wrap_err("Could not load the catalog")?;
    let movie = movies
        .get(id)
        .ok_or_else(|| CoreError::from(ValidationError::UnknownMovie(id.to_string())))?;

    let mut reviews = ReviewRepository::new(ctx.store.clone());
    let posted = reviews.add(movie, text, spoiler).await.map_err(|e| {
        if e.is_validation() {
            output.error(e.to_string());
        }
        e
    })?;

    output.success(format!("Review posted for {}", movie.title));
    output.data(&posted)?;
    Ok(())
}
