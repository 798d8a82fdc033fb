//! moviez - TMDB movie discovery CLI and terminal browser.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, TOKEN_ENV_VAR, TmdbConfig};
use crate::tui::{BrowserOptions, run_browser};
use moviez_api::pagination::{PageState, render_window};
use moviez_api::tmdb::{ListParams, ListingView, MAX_PAGE, TmdbApi, TmdbClient};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List popular movies.
    Popular(ListArgs),
    /// List top-rated movies.
    TopRated(ListArgs),
    /// List upcoming movies.
    Upcoming(ListArgs),
    /// List movies similar to a given movie.
    Similar(SimilarArgs),
    /// Discover movies by genre.
    Discover(DiscoverArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// List movie genres.
    Genres(GenresArgs),
    /// Browse movies in the terminal UI.
    Browse(BrowseArgs),
}

/// Paging and output options shared by listing subcommands.
#[derive(clap::Args)]
struct ListArgs {
    /// Page number (1-500).
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Print at most this many movies.
    #[arg(long)]
    limit: Option<usize>,

    /// Response language (default: config `tmdb.language`).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `similar` subcommand.
#[derive(clap::Args)]
struct SimilarArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,

    #[command(flatten)]
    list: ListArgs,
}

/// Arguments for the `discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Comma-separated genre IDs (see `moviez genres`).
    #[arg(long, value_delimiter = ',')]
    genres: Vec<u32>,

    #[command(flatten)]
    list: ListArgs,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query.
    #[arg(long)]
    query: String,

    #[command(flatten)]
    list: ListArgs,
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct GenresArgs {
    /// Response language (default: config `tmdb.language`).
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Listing shown on start.
    #[arg(value_enum, default_value_t = StartListing::Popular)]
    listing: StartListing,
}

/// Listings the browser can start on.
#[derive(Clone, Copy, ValueEnum)]
enum StartListing {
    /// Popular movies.
    Popular,
    /// Top-rated movies.
    TopRated,
    /// Upcoming movies.
    Upcoming,
}

impl StartListing {
    /// Returns the listing view for this choice.
    fn view(self) -> ListingView {
        match self {
            Self::Popular => ListingView::popular(),
            Self::TopRated => ListingView::top_rated(),
            Self::Upcoming => ListingView::upcoming(),
        }
    }
}

/// Builds a `TmdbClient` from config and `TMDB_API_TOKEN`.
///
/// # Errors
///
/// Returns an error if no token is available, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig) -> Result<TmdbClient> {
    let api_token = config.resolve_token(std::env::var(TOKEN_ENV_VAR).ok())?;
    let base_url = Url::parse(&config.base_url)
        .with_context(|| format!("invalid tmdb.base_url: {}", config.base_url))?;

    let client = TmdbClient::builder()
        .base_url(base_url)
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")?;
    tracing::debug!(base_url = %client.base_url(), "TMDB client ready");

    Ok(client)
}

/// Fetches one page of a listing and logs it.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all, fields(listing = %view.resource, page = args.page))]
async fn run_listing(view: ListingView, args: &ListArgs, config: &TmdbConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.language);
    let params = ListParams::page(args.page).language(language);

    let page = client
        .movie_list(&view.resource, &params)
        .await
        .with_context(|| format!("TMDB {} request failed", view.resource.path()))?;

    tracing::info!("{}", view.title);
    if page.results.is_empty() {
        tracing::info!("{}", view.empty_text);
    } else {
        tracing::info!("ID\tRating\t\tYear\tTitle");
        let limit = args.limit.unwrap_or(usize::MAX);
        for movie in page.results.iter().take(limit) {
            tracing::info!(
                "{}\t★ {}/10\t{}\t{}",
                movie.id,
                movie.rating_label(),
                movie
                    .release_year()
                    .map_or_else(|| String::from("-"), |y| y.to_string()),
                movie.title,
            );
        }
    }

    let state = PageState::new(page.page.max(1), page.total_pages.min(MAX_PAGE));
    tracing::info!("Total Movies: {}", page.total_results);
    tracing::info!("Page: {}", render_window(&state));

    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_genres(args: &GenresArgs, config: &TmdbConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.language);

    let list = client
        .genre_list(language)
        .await
        .context("TMDB genre/movie/list request failed")?;

    tracing::info!("ID\tName");
    for genre in &list.genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config: &TmdbConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let options = BrowserOptions {
        view: args.listing.view(),
        language: config.language.clone(),
        image_base_url: config.image_base_url.clone(),
    };
    run_browser(&client, options).await
}

/// Registers an OTLP meter provider when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
///
/// The returned provider must be shut down before exit to flush metrics.
#[cfg(feature = "otel")]
fn init_meter_provider() -> Option<opentelemetry_sdk::metrics::SdkMeterProvider> {
    std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_http()
        .build()
        .ok()?;

    let meter_provider = opentelemetry_sdk::metrics::SdkMeterProvider::builder()
        .with_periodic_exporter(exporter)
        .build();
    opentelemetry::global::set_meter_provider(meter_provider.clone());

    Some(meter_provider)
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    #[cfg(feature = "otel")]
    let meter_provider = init_meter_provider();

    let cli = Cli::parse();
    let config = AppConfig::load(&AppConfig::default_path(cli.dir.as_deref())?)?;
    let tmdb = &config.tmdb;

    let result = match cli.command {
        Commands::Popular(args) => run_listing(ListingView::popular(), &args, tmdb).await,
        Commands::TopRated(args) => run_listing(ListingView::top_rated(), &args, tmdb).await,
        Commands::Upcoming(args) => run_listing(ListingView::upcoming(), &args, tmdb).await,
        Commands::Similar(args) => {
            run_listing(ListingView::similar(args.id), &args.list, tmdb).await
        }
        Commands::Discover(args) => {
            run_listing(ListingView::discover(args.genres), &args.list, tmdb).await
        }
        Commands::Search(args) => {
            run_listing(ListingView::search(args.query), &args.list, tmdb).await
        }
        Commands::Genres(args) => run_genres(&args, tmdb).await,
        Commands::Browse(args) => run_browse(&args, tmdb).await,
    };

    #[cfg(feature = "otel")]
    {
        if let Some(meter_provider) = meter_provider
            && let Err(e) = meter_provider.shutdown()
        {
            tracing::debug!(error = %e, "Failed to flush metrics");
        }
    }

    result
}
