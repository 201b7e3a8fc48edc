//! Axum route handlers for stateless extraction.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::Extraction;
use crate::models::Mode;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    pub mode: Mode,
}

/// POST /api/v1/extract
///
/// Runs extraction without touching any session. Never fails on upstream
/// errors; the response carries an advisory when the fallback was used.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<Extraction>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    Ok(Json(state.extractor.extract(&request.text, request.mode).await))
}
