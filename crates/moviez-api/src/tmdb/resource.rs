//! Movie list resources and the listing views built on them.

use std::fmt;

/// Highest page number TMDB accepts on list endpoints.
pub const MAX_PAGE: u32 = 500;

/// A paged movie list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieResource {
    /// `movie/popular`.
    Popular,
    /// `movie/top_rated`.
    TopRated,
    /// `movie/upcoming`.
    Upcoming,
    /// `movie/{movie_id}/similar`.
    Similar {
        /// Movie to find similar titles for.
        movie_id: u64,
    },
    /// `discover/movie`, optionally filtered by genre.
    Discover {
        /// Genre IDs joined into `with_genres` (empty = no filter).
        genre_ids: Vec<u32>,
    },
    /// `search/movie`.
    Search {
        /// Free-text query.
        query: String,
    },
}

impl MovieResource {
    /// Path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Popular => String::from("movie/popular"),
            Self::TopRated => String::from("movie/top_rated"),
            Self::Upcoming => String::from("movie/upcoming"),
            Self::Similar { movie_id } => format!("movie/{movie_id}/similar"),
            Self::Discover { .. } => String::from("discover/movie"),
            Self::Search { .. } => String::from("search/movie"),
        }
    }

    /// Resource-specific query parameters (page and language excluded).
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Discover { genre_ids } if !genre_ids.is_empty() => {
                vec![("with_genres", join_ids(genre_ids))]
            }
            Self::Search { query } => vec![("query", query.clone())],
            Self::Popular
            | Self::TopRated
            | Self::Upcoming
            | Self::Similar { .. }
            | Self::Discover { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for MovieResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;
        for (key, value) in self.query() {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Joins genre IDs with commas, as `with_genres` expects.
fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Clamps a requested page into `1..=MAX_PAGE`.
#[must_use]
pub fn clamp_page(page: u32) -> u32 {
    if page == 0 {
        tracing::warn!(page, "Page numbers start at 1, using page 1");
        return 1;
    }
    if page > MAX_PAGE {
        tracing::warn!(
            page,
            max_page = MAX_PAGE,
            "Requested page exceeds TMDB limit, clamping"
        );
        return MAX_PAGE;
    }
    page
}

/// A titled movie listing: what to fetch and how to present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    /// Endpoint to fetch pages from.
    pub resource: MovieResource,
    /// Heading shown above the grid.
    pub title: String,
    /// Text shown when a page comes back empty.
    pub empty_text: String,
}

impl ListingView {
    /// Builds the view for a resource with its standard heading and empty text.
    #[must_use]
    pub fn for_resource(resource: MovieResource) -> Self {
        let (title, empty_text) = match &resource {
            MovieResource::Popular => (
                String::from("Popular"),
                String::from("No popular movies available."),
            ),
            MovieResource::TopRated => (
                String::from("Top Rated Movies"),
                String::from("No top-rated movies available."),
            ),
            MovieResource::Upcoming => (
                String::from("Upcoming Movies"),
                String::from("No upcoming movies available."),
            ),
            MovieResource::Similar { .. } => (
                String::from("Similar Movies"),
                String::from("No similar movies available."),
            ),
            MovieResource::Discover { .. } => {
                (String::from("Genres"), String::from("No results found"))
            }
            MovieResource::Search { query } => (
                format!("Search: \"{query}\""),
                String::from("No movies found."),
            ),
        };
        Self {
            resource,
            title,
            empty_text,
        }
    }

    /// Popular movies.
    #[must_use]
    pub fn popular() -> Self {
        Self::for_resource(MovieResource::Popular)
    }

    /// Top-rated movies.
    #[must_use]
    pub fn top_rated() -> Self {
        Self::for_resource(MovieResource::TopRated)
    }

    /// Upcoming movies.
    #[must_use]
    pub fn upcoming() -> Self {
        Self::for_resource(MovieResource::Upcoming)
    }

    /// Movies similar to `movie_id`.
    #[must_use]
    pub fn similar(movie_id: u64) -> Self {
        Self::for_resource(MovieResource::Similar { movie_id })
    }

    /// Movies matching all of `genre_ids`.
    #[must_use]
    pub fn discover(genre_ids: Vec<u32>) -> Self {
        Self::for_resource(MovieResource::Discover { genre_ids })
    }

    /// Search results for `query`. Genre filters do not apply to searches.
    #[must_use]
    pub fn search(query: impl Into<String>) -> Self {
        Self::for_resource(MovieResource::Search {
            query: query.into(),
        })
    }
}
