/// TMDb metadata provider
///
/// Serves poster references, ratings and synopses from TMDb's movie-details
/// endpoint. Detail payloads are cached in Redis; critic text never flows
/// through here.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieRating, TmdbMovieDetails},
    services::providers::{MetadataProvider, PosterProvider, PLACEHOLDER_POSTER, PLACEHOLDER_SYNOPSIS},
};

const DETAIL_CACHE_TTL: u64 = 86_400; // 1 day
const POSTER_CACHE_TTL: u64 = 604_800; // 1 week

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    cache: Cache,
    api_key: String,
    api_url: String,
    image_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose outbound calls carry a bounded timeout
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        image_url: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            cache,
            api_key,
            api_url,
            image_url,
        })
    }

    /// Fetches (and caches) the raw detail payload for a movie
    async fn fetch_details(&self, movie_id: i64) -> AppResult<TmdbMovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetail(movie_id),
            DETAIL_CACHE_TTL,
            async move {
                let url = format!("{}/movie/{}", self.api_url, movie_id);

                tracing::debug!(movie_id, "Fetching movie details from TMDb");

                let response = self
                    .http_client
                    .get(&url)
                    .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::ExternalApi(format!(
                        "TMDb returned status {}: {}",
                        status, body
                    )));
                }

                let details: TmdbMovieDetails = response.json().await?;
                Ok(details)
            }
        )
    }

    async fn poster_ref(&self, movie_id: i64) -> AppResult<String> {
        cached!(
            self.cache,
            CacheKey::PosterRef(movie_id),
            POSTER_CACHE_TTL,
            async move {
                let details = self.fetch_details(movie_id).await?;
                let poster = details
                    .poster_path
                    .map(|path| format!("{}{}", self.image_url, path))
                    .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string());
                Ok::<_, AppError>(poster)
            }
        )
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn fetch_poster_ref(&self, movie_id: i64) -> String {
        match self.poster_ref(movie_id).await {
            Ok(poster) => poster,
            Err(e) => {
                tracing::warn!(error = %e, movie_id, "Poster lookup failed, using placeholder");
                PLACEHOLDER_POSTER.to_string()
            }
        }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_rating(&self, movie_id: i64) -> MovieRating {
        match self.fetch_details(movie_id).await {
            Ok(details) => MovieRating::from_vote_average(details.vote_average),
            Err(e) => {
                tracing::warn!(error = %e, movie_id, "Rating lookup failed");
                MovieRating::from_vote_average(0.0)
            }
        }
    }

    async fn fetch_synopsis(&self, movie_id: i64) -> String {
        match self.fetch_details(movie_id).await {
            Ok(details) => details
                .overview
                .filter(|overview| !overview.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_SYNOPSIS.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, movie_id, "Synopsis lookup failed");
                PLACEHOLDER_SYNOPSIS.to_string()
            }
        }
    }
}
