use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    catalog::CatalogStore,
    db::{AccountStore, ReviewStore},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{
        providers::{MetadataProvider, PosterProvider},
        RecommendationEngine,
    },
};

pub mod auth;
pub mod movies;
pub mod recommendations;
pub mod reviews;

/// Shared application state
///
/// Catalog, scorer and engine are immutable after startup; the only mutable
/// state behind this struct is the relational store.
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub engine: RecommendationEngine,
    pub reviews: ReviewStore,
    pub accounts: AccountStore,
    pub metadata: Arc<dyn MetadataProvider>,
    pub posters: Arc<dyn PosterProvider>,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/movies", get(movies::list))
        .route("/movies/:title", get(movies::detail))
        .route("/recommendations", post(recommendations::recommend))
        .route("/reviews", post(reviews::post_review))
        .route("/reviews/:movie_id", get(reviews::reviews_for_movie))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/account", put(auth::update_account))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
