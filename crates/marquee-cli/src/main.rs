use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::Context;
use commands::{admin, browse, config, mark, review, show, AppContext};
use marquee_config::StoreBackend;
use marquee_models::{split_list, FilterBy, MovieDraft, SortBy};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Marquee - Browse, track and review your movie catalog")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Data store backend, overriding the configuration file (rest or memory)
    #[arg(long, global = true, value_name = "BACKEND")]
    store: Option<StoreBackend>,

    /// JSON seed file for the memory backend
    #[arg(long, global = true, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// Write logs to a daily-rotated file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    #[command(long_about = "List movies matching a search, filter and sort, with each movie's review count and most recent review. Search matches title, genre, language and country. Filter and sort default to the [browse] section of the configuration.")]
    Browse {
        /// Case-insensitive text to search for
        #[arg(short, long)]
        search: Option<String>,

        /// all, watched, unwatched or favorites
        #[arg(short, long)]
        filter: Option<FilterBy>,

        /// year-desc, year-asc, favorites or watched
        #[arg(long)]
        sort: Option<SortBy>,

        /// Skip the per-movie review queries
        #[arg(long, action = ArgAction::SetTrue)]
        no_reviews: bool,
    },
    /// Show one movie and its reviews
    Show {
        /// Movie id
        id: String,

        /// Print spoiler-tagged reviews instead of hiding them
        #[arg(long, action = ArgAction::SetTrue)]
        reveal_spoilers: bool,
    },
    /// Mark a movie as watched or favorite
    Mark {
        /// Movie id
        id: String,

        #[arg(long)]
        watched: Option<bool>,

        #[arg(long)]
        favorite: Option<bool>,
    },
    /// Post a review for a watched movie
    Review {
        /// Movie id
        id: String,

        /// Review text
        text: String,

        /// Tag the review as containing spoilers
        #[arg(long, action = ArgAction::SetTrue)]
        spoiler: bool,
    },
    /// Manage the catalog
    Admin {
        #[command(subcommand)]
        cmd: AdminCommands,
    },
    /// Configure the data store and credentials
    #[command(long_about = "Manage configuration and credentials for Marquee. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Catalog statistics: totals, most reviewed movies and latest reviews
    Dashboard,
    /// List every movie in the catalog
    List,
    /// Add a movie; every field is required
    Add {
        #[command(flatten)]
        fields: MovieFields,
    },
    /// Edit a movie; fields not given keep their current value
    Edit {
        /// Movie id
        id: String,

        #[command(flatten)]
        fields: MovieFields,
    },
    /// Delete a movie together with its reviews
    Delete {
        /// Movie id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct MovieFields {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    year: Option<i32>,

    /// Poster image URL
    #[arg(long)]
    poster: Option<String>,

    /// Comma-separated, e.g. "Drama, Thriller"
    #[arg(long)]
    genres: Option<String>,

    #[arg(long)]
    director: Option<String>,

    /// Comma-separated cast members
    #[arg(long)]
    cast: Option<String>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    language: Option<String>,

    #[arg(long)]
    synopsis: Option<String>,
}

impl MovieFields {
    /// Overlay the given fields on `draft`
    pub fn apply(self, mut draft: MovieDraft) -> MovieDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(year) = self.year {
            draft.year = year;
        }
        if let Some(poster) = self.poster {
            draft.poster = poster;
        }
        if let Some(genres) = self.genres {
            draft.genres = split_list(&genres);
        }
        if let Some(director) = self.director {
            draft.director = director;
        }
        if let Some(cast) = self.cast {
            draft.cast_members = split_list(&cast);
        }
        if let Some(country) = self.country {
            draft.country = country;
        }
        if let Some(language) = self.language {
            draft.language = language;
        }
        if let Some(synopsis) = self.synopsis {
            draft.synopsis = synopsis;
        }
        draft
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Print the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Configure the data store backend
    #[command(long_about = "Set the data store backend and its location. With no flags, prompts for the PostgREST URL.")]
    Store {
        #[arg(long)]
        backend: Option<StoreBackend>,

        /// PostgREST base URL, e.g. https://xyz.supabase.co
        #[arg(long)]
        url: Option<String>,

        /// Seed file for the memory backend
        #[arg(long, value_name = "FILE")]
        seed_file: Option<PathBuf>,
    },

    /// Store the data store API key (prompts when omitted)
    ApiKey {
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let (store, seed) = (cli.store, cli.seed);
    let open = || AppContext::load(store, seed.clone()).wrap_err("Failed to open the data store");

    match cli.command {
        Commands::Browse {
            search,
            filter,
            sort,
            no_reviews,
        } => browse::run_browse(&open()?, search, filter, sort, no_reviews, &output).await,
        Commands::Show { id, reveal_spoilers } => show::run_show(&open()?, &id, reveal_spoilers, &output).await,
        Commands::Mark { id, watched, favorite } => mark::run_mark(&open()?, &id, watched, favorite, &output).await,
        Commands::Review { id, text, spoiler } => review::run_review(&open()?, &id, &text, spoiler, &output).await,
        Commands::Admin { cmd } => {
            let ctx = open()?;
            match cmd {
                AdminCommands::Dashboard => admin::run_dashboard(&ctx, &output).await,
                AdminCommands::List => admin::run_list(&ctx, &output).await,
                AdminCommands::Add { fields } => admin::run_add(&ctx, fields, &output).await,
                AdminCommands::Edit { id, fields } => admin::run_edit(&ctx, &id, fields, &output).await,
                AdminCommands::Delete { id, yes } => admin::run_delete(&ctx, &id, yes, &output).await,
            }
        }
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_browse_flags() {
        let cli = Cli::try_parse_from([
            "marquee", "--store", "memory", "browse", "--filter", "favorites", "--sort", "year_asc",
        ])
        .unwrap();
        assert_eq!(cli.store, Some(StoreBackend::Memory));
        match cli.command {
            Commands::Browse { filter, sort, search, .. } => {
                assert_eq!(filter, Some(FilterBy::Favorites));
                assert_eq!(sort, Some(SortBy::YearAsc));
                assert!(search.is_none());
            }
            _ => panic!("expected browse"),
        }
    }

    #[test]
    fn test_movie_fields_overlay() {
        let cli = Cli::try_parse_from([
            "marquee", "admin", "edit", "m1", "--genres", "Drama, ,War", "--year", "1957",
        ])
        .unwrap();
        let fields = match cli.command {
            Commands::Admin {
                cmd: AdminCommands::Edit { fields, .. },
            } => fields,
            _ => panic!("expected admin edit"),
        };

        let base = MovieDraft {
            title: "Paths of Glory".to_string(),
            year: 1900,
            ..MovieDraft::default()
        };
        let draft = fields.apply(base);
        assert_eq!(draft.title, "Paths of Glory");
        assert_eq!(draft.year, 1957);
        assert_eq!(draft.genres, vec!["Drama".to_string(), "War".to_string()]);
    }
}
