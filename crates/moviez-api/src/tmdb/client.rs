//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::rate_limiter::RequestPacer;
use super::resource::{MovieResource, clamp_page};
use super::types::{GenreList, ListParams, MoviePage, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Request pacer shared by all calls on this client.
    pacer: Arc<Mutex<RequestPacer>>,
    /// `tmdb.requests` counter, one increment per HTTP request.
    #[cfg(feature = "otel")]
    request_counter: opentelemetry::metrics::Counter<u64>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
    #[cfg(feature = "otel")]
    meter: Option<opentelemetry::metrics::Meter>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            min_interval: None,
            #[cfg(feature = "otel")]
            meter: None,
        }
    }

    /// Overrides the base URL (config file, or wiremock in tests).
    ///
    /// A missing trailing slash is added so relative paths join below it.
    #[must_use]
    pub fn base_url(mut self, mut url: Url) -> Self {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Sets the meter for request metrics (default: the global meter).
    #[cfg(feature = "otel")]
    #[must_use]
    pub fn meter(mut self, meter: opentelemetry::metrics::Meter) -> Self {
        self.meter = Some(meter);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        if api_token.trim().is_empty() {
            bail!("api_token must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let pacer = self
            .min_interval
            .map_or_else(RequestPacer::default_interval, RequestPacer::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        #[cfg(feature = "otel")]
        let request_counter = self
            .meter
            .unwrap_or_else(|| opentelemetry::global::meter(env!("CARGO_PKG_NAME")))
            .u64_counter("tmdb.requests")
            .with_description("TMDB API requests sent")
            .build();

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            pacer: Arc::new(Mutex::new(pacer)),
            #[cfg(feature = "otel")]
            request_counter,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a paced GET request with Bearer auth and query params.
    ///
    /// Each call is exactly one HTTP request; failures are not retried.
    #[instrument(skip_all, fields(path = %path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.pacer.lock().await.pace().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TMDB API request");
        #[cfg(feature = "otel")]
        self.request_counter
            .add(1, &[opentelemetry::KeyValue::new("path", path.to_owned())]);

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all, fields(resource = %resource, page = params.page))]
    async fn movie_list(&self, resource: &MovieResource, params: &ListParams) -> Result<MoviePage> {
        let mut query: Vec<(&str, String)> = resource.query();
        query.push(("language", params.language.clone()));
        query.push(("page", clamp_page(params.page).to_string()));

        let page: MoviePage = self.get_json(&resource.path(), &query).await?;
        tracing::debug!(
            page = page.page,
            total_pages = page.total_pages,
            total_results = page.total_results,
            "Movie list page received"
        );
        Ok(page)
    }

    #[instrument(skip_all)]
    async fn genre_list(&self, language: &str) -> Result<GenreList> {
        let query = [("language", String::from(language))];
        self.get_json("genre/movie/list", &query).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn test_client(mock_server: &wiremock::MockServer, token: &str) -> TmdbClient {
        let base_url = format!("{}/3/", mock_server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token(token)
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_token() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_token is required")
        );
    }

    #[test]
    fn test_builder_rejects_blank_api_token() {
        // Arrange & Act
        let result = TmdbClient::builder()
            .api_token("   ")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(result.unwrap_err().to_string().contains("must not be empty"));
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_token("test-token").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_default_base_url() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_adds_trailing_slash() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url)
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/3/");
    }

    #[test]
    fn test_parse_movie_popular_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_popular_page1.json");

        // Act
        let response: MoviePage = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.page, 1);
        assert_eq!(response.total_pages, 500);
        assert_eq!(response.results.len(), 3);
        let first = &response.results[0];
        assert_eq!(first.id, 693_134);
        assert_eq!(first.title, "Dune: Part Two");
        assert_eq!(first.release_year(), Some(2024));
    }

    #[test]
    fn test_parse_genre_list_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/genre_movie_list.json");

        // Act
        let response: GenreList = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.genres.len(), 19);
        assert_eq!(response.genres[0].id, 28);
        assert_eq!(response.genres[0].name, "Action");
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_popular_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_popular_page1.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/popular"))
            .and(wiremock::matchers::query_param("language", "en-US"))
            .and(wiremock::matchers::query_param("page", "1"))
            .and(wiremock::matchers::header_exists("Authorization"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "test-token");

        // Act
        let page = client
            .movie_list(&MovieResource::Popular, &ListParams::default())
            .await
            .unwrap();

        // Assert
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.total_results, 10_000);
    }

    #[tokio::test]
    async fn test_similar_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_similar_550.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/550/similar"))
            .and(wiremock::matchers::query_param("page", "2"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "test-token");

        // Act
        let page = client
            .movie_list(
                &MovieResource::Similar { movie_id: 550 },
                &ListParams::page(2),
            )
            .await
            .unwrap();

        // Assert
        assert_eq!(page.page, 2);
        assert_eq!(page.results[0].id, 807);
    }

    #[tokio::test]
    async fn test_discover_sends_with_genres() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_popular_page1.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/discover/movie"))
            .and(wiremock::matchers::query_param("with_genres", "28,878"))
            .and(wiremock::matchers::query_param("language", "en"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "test-token");
        let resource = MovieResource::Discover {
            genre_ids: vec![28, 878],
        };

        // Act
        let page = client
            .movie_list(&resource, &ListParams::page(1).language("en"))
            .await
            .unwrap();

        // Assert
        assert!(!page.results.is_empty());
    }

    #[tokio::test]
    async fn test_search_sends_query() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_list_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "no such film"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "test-token");
        let resource = MovieResource::Search {
            query: String::from("no such film"),
        };

        // Act
        let page = client
            .movie_list(&resource, &ListParams::default())
            .await
            .unwrap();

        // Assert
        assert!(page.results.is_empty());
        assert_eq!(page.total_results, 0);
    }

    #[tokio::test]
    async fn test_page_over_limit_is_clamped() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_list_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::query_param("page", "500"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "test-token");

        // Act & Assert (mock expect(1) verifies the clamped page)
        client
            .movie_list(&MovieResource::TopRated, &ListParams::page(9_999))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_genre_list_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/genre_movie_list.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/genre/movie/list"))
            .and(wiremock::matchers::query_param("language", "en"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "test-token");

        // Act
        let genres = client.genre_list("en").await.unwrap();

        // Assert
        assert_eq!(genres.genres.len(), 19);
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_list_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::header(
                "Authorization",
                "Bearer my-secret-token",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "my-secret-token");

        // Act & Assert (mock expect(1) verifies Authorization header)
        client
            .movie_list(&MovieResource::Upcoming, &ListParams::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_http_error_returns_tmdb_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "invalid-token");

        // Act
        let result = client
            .movie_list(&MovieResource::Popular, &ListParams::default())
            .await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_with_plain_body() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "test-token");

        // Act
        let result = client.genre_list("en").await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("502"));
        assert!(err.contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_http_429_is_not_retried() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "test-token");

        // Act
        let result = client
            .movie_list(&MovieResource::Popular, &ListParams::default())
            .await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("over the allowed limit"));
    }

    #[tokio::test]
    async fn test_invalid_json_reports_decode_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, "test-token");

        // Act
        let result = client
            .movie_list(&MovieResource::Popular, &ListParams::default())
            .await;

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("failed to decode JSON response")
        );
    }

    #[cfg(feature = "otel")]
    #[tokio::test]
    async fn test_request_counter_records_each_request() {
        use opentelemetry::metrics::MeterProvider;
        use opentelemetry_sdk::metrics::data::{AggregatedMetrics, MetricData};
        use opentelemetry_sdk::metrics::{InMemoryMetricExporter, SdkMeterProvider};

        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_list_empty.json");
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let exporter = InMemoryMetricExporter::default();
        let provider = SdkMeterProvider::builder()
            .with_periodic_exporter(exporter.clone())
            .build();
        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", mock_server.uri()).parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .meter(provider.meter("moviez-api-test"))
            .build()
            .unwrap();

        // Act
        client
            .movie_list(&MovieResource::Popular, &ListParams::default())
            .await
            .unwrap();
        client
            .movie_list(&MovieResource::Upcoming, &ListParams::default())
            .await
            .unwrap();
        provider.force_flush().unwrap();

        // Assert
        let batches = exporter.get_finished_metrics().unwrap();
        let total: u64 = batches
            .last()
            .unwrap()
            .scope_metrics()
            .flat_map(|scope| scope.metrics())
            .filter(|metric| metric.name() == "tmdb.requests")
            .map(|metric| match metric.data() {
                AggregatedMetrics::U64(MetricData::Sum(sum)) => {
                    sum.data_points().map(|point| point.value()).sum()
                }
                _ => 0,
            })
            .sum();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_movie_list_runs_on_spawned_task() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_list_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/top_rated"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = Arc::new(test_client(&mock_server, "test-token"));

        // Act
        let task = tokio::spawn({
            let client = Arc::clone(&client);
            async move {
                client
                    .movie_list(&MovieResource::TopRated, &ListParams::default())
                    .await
            }
        });
        let page = task.await.unwrap().unwrap();

        // Assert
        assert!(page.results.is_empty());
        assert_eq!(client.base_url().path(), "/3/");
    }

    #[tokio::test]
    async fn test_pacer_enforces_interval() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_list_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(2)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        // Act
        let start = std::time::Instant::now();
        client
            .movie_list(&MovieResource::Popular, &ListParams::page(1))
            .await
            .unwrap();
        client
            .movie_list(&MovieResource::Popular, &ListParams::page(2))
            .await
            .unwrap();
        let elapsed = start.elapsed();

        // Assert: at least 100ms between the two requests
        assert!(elapsed >= Duration::from_millis(100));
    }
}
