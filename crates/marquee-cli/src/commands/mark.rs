use super::AppContext;
use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;
use marquee_core::{CoreError, MovieRepository, ValidationError};

pub async fn run_mark(
    ctx: &AppContext,
    id: &str,
    watched: Option<bool>,
    favorite: Option<bool>,
    output: &Output,
) -> Result<()> {
    if watched.is_none() && favorite.is_none() {
        return Err(color_eyre::eyre::eyre!(
            "Nothing to change. Pass --watched <true|false> and/or --favorite <true|false>"
        ));
    }

    let mut movies = MovieRepository::new(ctx.store.clone());
    movies.fetch_all().await.wrap_err("Could not load the catalog")?;
    let title = movies
        .get(id)
        .map(|m| m.title.clone())
        .ok_or_else(|| CoreError::from(ValidationError::UnknownMovie(id.to_string())))?;

    if let Some(watched) = watched {
        movies
            .set_watched(id, watched)
            .await
            .wrap_err_with(|| format!("Could not update {}", title))?;
        output.success(if watched {
            format!("Marked {} as watched", title)
        } else {
            format!("Marked {} as not watched", title)
        });
    }

    if let Some(favorite) = favorite {
        movies
            .set_favorite(id, favorite)
            .await
            .wrap_err_with(|| format!("Could not update {}", title))?;
        output.success(if favorite {
            format!("Added {} to favorites", title)
        } else {
            format!("Removed {} from favorites", title)
        });
    }

    if let Some(movie) = movies.get(id) {
        output.data(movie)?;
    }
    Ok(())
}
