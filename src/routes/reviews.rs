use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::ReviewRecord,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct PostReviewRequest {
    pub user_id: i64,
    pub movie_id: i64,
    pub review_text: String,
}

#[derive(Debug, Serialize)]
pub struct PostReviewResponse {
    pub success: bool,
}

/// Handler for posting a review
///
/// Blank text is rejected here; the store itself never validates content.
/// A storage failure comes back as `success: false`, not as an error
/// status.
pub async fn post_review(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PostReviewRequest>,
) -> AppResult<Json<PostReviewResponse>> {
    let text = request.review_text.trim();
    if text.is_empty() {
        return Err(AppError::InvalidInput(
            "Review text cannot be empty".to_string(),
        ));
    }

    let success = state
        .reviews
        .post(request.user_id, request.movie_id, text)
        .await;

    Ok(Json(PostReviewResponse { success }))
}

/// Handler for listing a movie's reviews, most recent first
pub async fn reviews_for_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<Vec<ReviewRecord>>> {
    let reviews = state.reviews.fetch_for_movie(movie_id).await?;
    Ok(Json(reviews))
}
