use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::MovieDetail, routes::AppState};

/// Handler for the catalog title listing
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.titles())
}

/// Handler for the enriched movie-detail view
///
/// Unknown titles are a hard 404; metadata lookups degrade to placeholders
/// rather than failing the request.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> AppResult<Json<MovieDetail>> {
    let movie = state.catalog.lookup_by_title(&title)?.clone();

    let (rating, synopsis, poster) = tokio::join!(
        state.metadata.fetch_rating(movie.movie_id),
        state.metadata.fetch_synopsis(movie.movie_id),
        state.posters.fetch_poster_ref(movie.movie_id),
    );

    Ok(Json(MovieDetail {
        movie_id: movie.movie_id,
        title: movie.title,
        rating,
        synopsis,
        poster,
    }))
}
