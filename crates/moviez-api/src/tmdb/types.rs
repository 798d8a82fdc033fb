//! TMDB API response types and list parameters.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

// --- Movie lists ---

/// One page of a movie list endpoint (`movie/popular`, `discover/movie`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    /// Current page number.
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<Movie>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

impl MoviePage {
    /// Returns an empty single page (used before the first fetch).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 1,
            total_results: 0,
        }
    }
}

/// A single movie list entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Release date (YYYY-MM-DD, empty or null).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl Movie {
    /// Parses the release year out of `release_date`.
    ///
    /// TMDB sends `""` for unknown dates, which yields `None`.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    /// Vote average rounded to one decimal, as shown on movie cards.
    #[must_use]
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }
}

// --- Genres ---

/// Response from `genre/movie/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    /// All movie genres.
    pub genres: Vec<Genre>,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}

// --- List Parameters ---

/// Common parameters for movie list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            page: 1,
        }
    }
}

impl ListParams {
    /// Creates params for the given page with the default language.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
