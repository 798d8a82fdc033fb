//! Request pacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default spacing between consecutive requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Keeps consecutive TMDB requests at least `min_interval` apart.
///
/// Requests are never retried; a page change that arrives too soon after
/// the previous one is only delayed.
#[derive(Debug)]
pub struct RequestPacer {
    /// Minimum spacing between requests.
    min_interval: Duration,
    /// When the previous request was released.
    last_release: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the given spacing.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_release: None,
        }
    }

    /// Creates a pacer with the default spacing (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Sleeps until the next request may be sent.
    pub async fn pace(&mut self) {
        if let Some(last) = self.last_release {
            let remaining = self.min_interval.saturating_sub(last.elapsed());
            if !remaining.is_zero() {
                tracing::trace!(wait_ms = remaining.as_millis(), "Pacing TMDB request");
                tokio::time::sleep(remaining).await;
            }
        }

        self.last_release = Some(Instant::now());
    }
}
