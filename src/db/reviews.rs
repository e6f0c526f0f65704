use chrono::Utc;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::ReviewRecord;

/// Persistence for user-submitted movie reviews
///
/// Reviews are append-only: a post creates a new row with a server-assigned
/// id and timestamp, and nothing here edits or deduplicates existing rows.
#[derive(Clone)]
pub struct ReviewStore {
    pool: PgPool,
}

impl ReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a review, reporting success as a boolean
    ///
    /// Storage failures are logged and converted to `false`; a failed post
    /// must not take down the caller's request.
    pub async fn post(&self, user_id: i64, movie_id: i64, review_text: &str) -> bool {
        let result = sqlx::query(
            "INSERT INTO reviews (user_id, movie_id, review_text, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(review_text)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    user_id,
                    movie_id,
                    "Failed to persist review"
                );
                false
            }
        }
    }

    /// All reviews for a movie, most recent first
    ///
    /// An empty result is a valid outcome; read failures propagate so they
    /// stay distinguishable from "no reviews yet".
    pub async fn fetch_for_movie(&self, movie_id: i64) -> AppResult<Vec<ReviewRecord>> {
        let reviews = sqlx::query_as::<_, ReviewRecord>(
            "SELECT id, user_id, movie_id, review_text, created_at \
             FROM reviews WHERE movie_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
