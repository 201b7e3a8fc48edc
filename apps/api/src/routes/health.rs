use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and which external collaborators are wired up.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let sessions = state.sessions.len().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "sessions": sessions,
        "capabilities": {
            "backend": state.profiles.is_configured(),
            "ai": state.extractor.is_configured(),
            "auth": state.identity.is_some()
        }
    }))
}
