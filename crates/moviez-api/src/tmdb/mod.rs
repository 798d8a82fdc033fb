//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie list endpoints
//! and retrieves paged movie listings and genres.

mod api;
mod client;
mod image;
mod rate_limiter;
mod resource;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
pub use image::{CARD_POSTER_SIZE, DEFAULT_IMAGE_BASE_URL, movie_page_url, poster_url};
pub use resource::{ListingView, MAX_PAGE, MovieResource, clamp_page};
#[allow(clippy::module_name_repetitions)]
pub use types::{Genre, GenreList, ListParams, Movie, MoviePage, TmdbErrorResponse};
