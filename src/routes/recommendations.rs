use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::RecommendationResult,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResult>> {
    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        "Processing recommendation request"
    );

    let result = state.engine.recommend(&request.title).await?;

    Ok(Json(result))
}
