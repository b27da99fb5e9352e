use super::AppContext;
use crate::output::{new_table, truncate, Output};
use color_eyre::eyre::Context;
use color_eyre::Result;
use comfy_table::Cell;
use marquee_core::{build_page, project, BrowsePage, MovieRepository, ReviewEnricher, ViewQuery};
use marquee_models::{FilterBy, MovieCard, SortBy};

const SNIPPET_WIDTH: usize = 60;

pub async fn run_browse(
    ctx: &AppContext,
    search: Option<String>,
    filter: Option<FilterBy>,
    sort: Option<SortBy>,
    no_reviews: bool,
    output: &Output,
) -> Result<()> {
    let query = ViewQuery::new(
        search.unwrap_or_default(),
        filter.unwrap_or(ctx.config.browse.filter),
        sort.unwrap_or(ctx.config.browse.sort),
    );
    tracing::debug!(search = %query.search, filter = %query.filter, sort = %query.sort, "Browse started");

    let mut movies = MovieRepository::new(ctx.store.clone());
    movies.fetch_all().await.wrap_err("Could not load the catalog")?;

    let batch = if no_reviews {
        None
    } else {
        let visible = project(movies.movies(), &query);
        let enricher = ReviewEnricher::from_config(ctx.store.clone(), &ctx.config.enrichment);
        let batch = enricher.enrich(&visible).await;
        enricher.accept(batch)
    };

    let page = build_page(movies.movies(), &query, batch.as_ref());
    if page.enrichment_failures > 0 {
        output.warn(format!(
            "Review data unavailable for {} of {} movies",
            page.enrichment_failures,
            page.cards.len()
        ));
    }

    if output.is_human() {
        render_page(&page, !no_reviews, output);
    } else {
        output.data(&page)?;
    }
    Ok(())
}

fn render_page(page: &BrowsePage, with_reviews: bool, output: &Output) {
    if let Some(message) = page.empty_message {
        output.info(message);
        return;
    }

    let mut table = new_table();
    let mut header = vec!["ID", "Title", "Year", "Genres", "Watched", "Favorite"];
    if with_reviews {
        header.extend(["Reviews", "Latest review"]);
    }
    table.set_header(header);

    for card in &page.cards {
        table.add_row(card_row(card, with_reviews));
    }
    output.table(&table);
    output.println(format!("{} movies", page.cards.len()));
}

fn card_row(card: &MovieCard, with_reviews: bool) -> Vec<Cell> {
    let movie = &card.movie;
    let mut row = vec![
        Cell::new(&movie.id),
        Cell::new(&movie.title),
        Cell::new(movie.year),
        Cell::new(movie.genres.join(", ")),
        Cell::new(if movie.watched { "✓" } else { "" }),
        Cell::new(if movie.favorite { "★" } else { "" }),
    ];
    if with_reviews {
        row.push(Cell::new(card.reviews.review_count));
        row.push(Cell::new(
            card.reviews
                .review_snippet
                .as_deref()
                .map(|s| truncate(s, SNIPPET_WIDTH))
                .unwrap_or_default(),
        ));
    }
    row
}
