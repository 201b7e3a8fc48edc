use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::navigation::NavigationError;
use crate::profiles::draft::DraftError;
use crate::profiles::PersistenceError;
use crate::swipe::deck::DeckError;
use crate::voice::CaptureError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The request is well-formed but collides with the session's current state
    /// (an operation already in flight, an invalid screen transition).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<NavigationError> for AppError {
    fn from(e: NavigationError) -> Self {
        AppError::Conflict(e.to_string())
    }
}

impl From<DeckError> for AppError {
    fn from(e: DeckError) -> Self {
        AppError::Conflict(e.to_string())
    }
}

impl From<DraftError> for AppError {
    fn from(e: DraftError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<CaptureError> for AppError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::TranscriptTooLong { .. } => AppError::Validation(e.to_string()),
            CaptureError::AlreadyListening | CaptureError::NotListening => {
                AppError::Conflict(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, retryable) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), false),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                false,
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), true),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
                false,
            ),
            AppError::Persistence(PersistenceError::InvalidRow(e)) => {
                tracing::error!("Profile store returned a malformed row: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "INVALID_PROFILE_ROW",
                    "The stored profile is malformed and cannot be loaded.".to_string(),
                    false,
                )
            }
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PERSISTENCE_ERROR",
                    "Could not reach the profile store. Please try again.".to_string(),
                    true,
                )
            }
            AppError::Auth(AuthError::NotConfigured) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AUTH_NOT_CONFIGURED",
                AuthError::NotConfigured.to_string(),
                false,
            ),
            AppError::Auth(AuthError::InvalidSession) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_SESSION",
                "The stored session is no longer valid. Please sign in again.".to_string(),
                false,
            ),
            AppError::Auth(e) => {
                tracing::error!("Auth error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AUTH_ERROR",
                    "Could not reach the sign-in service. Please try again.".to_string(),
                    true,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    false,
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "retryable": retryable
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    use crate::models::profile::RowShapeError;

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_store_failure_is_retryable() {
        let error = AppError::Persistence(PersistenceError::Api {
            status: 503,
            code: None,
            message: "unavailable".to_string(),
        });
        let (status, body) = render(error).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");
        assert_eq!(body["error"]["retryable"], true);
    }

    #[tokio::test]
    async fn test_malformed_row_is_not_retryable() {
        let error = AppError::Persistence(PersistenceError::InvalidRow(RowShapeError::UnknownMode(
            "recruiter".to_string(),
        )));
        let (status, body) = render(error).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "INVALID_PROFILE_ROW");
        assert_eq!(body["error"]["retryable"], false);
    }

    #[tokio::test]
    async fn test_conflict_body_shape() {
        let (status, body) = render(AppError::Conflict("busy".to_string())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "busy");
    }

    #[tokio::test]
    async fn test_overlong_transcript_is_a_validation_error() {
        let error = AppError::from(CaptureError::TranscriptTooLong { limit: 4000 });
        let (status, body) = render(error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
