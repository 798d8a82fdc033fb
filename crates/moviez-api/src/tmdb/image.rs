//! Poster image and movie page URLs.

/// Default TMDB image service base URL.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Poster size used on movie cards.
pub const CARD_POSTER_SIZE: &str = "w1280";

/// TMDB website base URL for movie pages.
const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie";

/// Builds a poster URL: `{image_base_url}/{size}/{poster_path}`.
///
/// Returns `None` when the movie has no poster.
#[must_use]
pub fn poster_url(image_base_url: &str, size: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path?.trim_start_matches('/');
    if path.is_empty() {
        return None;
    }
    let base = image_base_url.trim_end_matches('/');
    Some(format!("{base}/{size}/{path}"))
}

/// Builds the TMDB website URL for a movie.
#[must_use]
pub fn movie_page_url(movie_id: u64) -> String {
    format!("{MOVIE_PAGE_BASE_URL}/{movie_id}")
}
