use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthorizeQuery {
    pub redirect_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub url: String,
}

/// GET /api/v1/auth/authorize
///
/// Returns the provider URL that starts the OAuth redirect flow. The client
/// comes back with the issued token via `POST /sessions/:id/sign-in`.
pub async fn handle_authorize(
    State(state): State<AppState>,
    Query(query): Query<AuthorizeQuery>,
) -> Result<Json<AuthorizeResponse>, AppError> {
    let identity = state.identity.as_ref().ok_or(AuthError::NotConfigured)?;
    let redirect_to = query
        .redirect_to
        .filter(|r| !r.trim().is_empty())
        .or_else(|| state.config.oauth_redirect_url.clone())
        .ok_or_else(|| AppError::Validation("redirect_to is required".to_string()))?;

    Ok(Json(AuthorizeResponse {
        url: identity.authorize_url(&redirect_to),
    }))
}
