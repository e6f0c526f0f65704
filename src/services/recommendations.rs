use std::sync::Arc;

use crate::{
    catalog::CatalogStore,
    error::{AppError, AppResult},
    models::{MovieRecord, RecommendationResult, Strategy},
    sentiment::SentimentScorer,
    services::providers::{CriticReviewProvider, PosterProvider, PLACEHOLDER_POSTER},
};

/// Sentiment above this routes to the similarity branch; at or below it the
/// engine falls back to random alternatives. The comparison is strictly
/// greater-than.
pub const SENTIMENT_THRESHOLD: f32 = 0.2;

/// Every result carries exactly this many recommendations
const RECOMMENDATION_COUNT: usize = 5;

/// Smallest catalog that can produce 5 recommendations excluding the query
const MIN_CATALOG_SIZE: usize = RECOMMENDATION_COUNT + 1;

/// Sentiment-driven movie recommendation engine
///
/// Stateless: a request mutates nothing and holds only shared read-only
/// state, so any number of recommendations may run concurrently.
pub struct RecommendationEngine {
    catalog: Arc<CatalogStore>,
    scorer: Arc<SentimentScorer>,
    critic_reviews: Arc<dyn CriticReviewProvider>,
    posters: Arc<dyn PosterProvider>,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<CatalogStore>,
        scorer: Arc<SentimentScorer>,
        critic_reviews: Arc<dyn CriticReviewProvider>,
        posters: Arc<dyn PosterProvider>,
    ) -> Self {
        Self {
            catalog,
            scorer,
            critic_reviews,
            posters,
        }
    }

    /// Recommends exactly 5 (title, poster) pairs for a catalog title
    ///
    /// Unknown titles and an undersized catalog are the only hard failures;
    /// provider flakiness degrades to sentinel/placeholder values instead.
    /// The query movie itself never appears among the results.
    pub async fn recommend(&self, title: &str) -> AppResult<RecommendationResult> {
        // Resolve the title before any outbound call: an unknown title must
        // fail without touching the critic or poster collaborators.
        let row = self.catalog.row_index_of(title)?;

        if self.catalog.len() < MIN_CATALOG_SIZE {
            return Err(AppError::InsufficientCatalog(self.catalog.len()));
        }

        let reviews = self.critic_reviews.fetch_reviews(title).await;
        let sentiment = self.scorer.score(&reviews);
        let strategy = choose_strategy(sentiment);

        let picks: Vec<MovieRecord> = match strategy {
            Strategy::Similar => self
                .catalog
                .neighbors(row, RECOMMENDATION_COUNT)
                .into_iter()
                .map(|i| self.catalog.get(i).clone())
                .collect(),
            Strategy::Alternative => {
                // Draw one extra so dropping the query movie still leaves 5
                self.catalog
                    .sample_random(RECOMMENDATION_COUNT + 1)
                    .into_iter()
                    .filter(|m| m.row_index != row)
                    .take(RECOMMENDATION_COUNT)
                    .collect()
            }
        };

        tracing::info!(
            title,
            sentiment,
            review_count = reviews.len(),
            strategy = ?strategy,
            "Recommendation branch selected"
        );

        let movie_ids: Vec<i64> = picks.iter().map(|m| m.movie_id).collect();
        let titles: Vec<String> = picks.into_iter().map(|m| m.title).collect();
        let posters = self.fetch_posters(&movie_ids).await;

        Ok(RecommendationResult {
            titles,
            posters,
            sentiment,
            strategy,
        })
    }

    /// Resolves poster references in parallel, preserving input order
    async fn fetch_posters(&self, movie_ids: &[i64]) -> Vec<String> {
        let mut tasks = Vec::with_capacity(movie_ids.len());

        for &movie_id in movie_ids {
            let provider = Arc::clone(&self.posters);
            let task = tokio::spawn(async move { provider.fetch_poster_ref(movie_id).await });
            tasks.push(task);
        }

        let mut posters = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(poster) => posters.push(poster),
                Err(e) => {
                    tracing::error!(error = %e, "Poster task join error");
                    posters.push(PLACEHOLDER_POSTER.to_string());
                }
            }
        }

        posters
    }
}

/// Branch selection: strictly positive signal picks similarity
fn choose_strategy(sentiment: f32) -> Strategy {
    if sentiment > SENTIMENT_THRESHOLD {
        Strategy::Similar
    } else {
        Strategy::Alternative
    }
}
