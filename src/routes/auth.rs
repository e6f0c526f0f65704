use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::AccountSummary,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub username: String,
    pub password: String,
    pub new_username: Option<String>,
    pub new_password: Option<String>,
}

/// Handler for user signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<AccountSummary>)> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }

    let account = state.accounts.create(username, &request.password).await?;

    Ok((StatusCode::CREATED, Json(AccountSummary::from(&account))))
}

/// Handler for credential verification
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<Json<AccountSummary>> {
    let account = state
        .accounts
        .verify(&request.username, &request.password)
        .await?;

    Ok(Json(AccountSummary::from(&account)))
}

/// Handler for account updates; current credentials gate the change
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateAccountRequest>,
) -> AppResult<StatusCode> {
    state
        .accounts
        .verify(&request.username, &request.password)
        .await?;

    state
        .accounts
        .update_account(
            &request.username,
            request.new_username.as_deref(),
            request.new_password.as_deref(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
