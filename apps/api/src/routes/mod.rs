pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::extraction::handlers as extraction;
use crate::profiles::handlers as profiles;
use crate::sessions::handlers as sessions;
use crate::state::AppState;
use crate::swipe::handlers as swipe;
use crate::voice::handlers as voice;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/auth/authorize", get(auth::handle_authorize))
        .route("/api/v1/extract", post(extraction::handle_extract))
        // Session lifecycle and navigation
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/sign-in", post(sessions::handle_sign_in))
        .route("/api/v1/sessions/:id/demo", post(sessions::handle_demo_sign_in))
        .route("/api/v1/sessions/:id/sign-out", post(sessions::handle_sign_out))
        .route("/api/v1/sessions/:id/role", post(sessions::handle_select_role))
        .route("/api/v1/sessions/:id/navigate", post(sessions::handle_navigate))
        // Profile creation
        .route(
            "/api/v1/sessions/:id/draft",
            get(profiles::handle_get_draft).patch(profiles::handle_update_draft),
        )
        .route(
            "/api/v1/sessions/:id/draft/extract",
            post(profiles::handle_extract_into_draft),
        )
        .route(
            "/api/v1/sessions/:id/capture/start",
            post(voice::handle_start_capture),
        )
        .route(
            "/api/v1/sessions/:id/capture/segments",
            post(voice::handle_push_segments),
        )
        .route(
            "/api/v1/sessions/:id/capture/stop",
            post(voice::handle_stop_capture),
        )
        .route(
            "/api/v1/sessions/:id/capture/error",
            post(voice::handle_capture_error),
        )
        .route("/api/v1/sessions/:id/profile", get(profiles::handle_get_profile))
        .route(
            "/api/v1/sessions/:id/profile/complete",
            post(profiles::handle_complete_profile),
        )
        // Swiping
        .route("/api/v1/sessions/:id/deck", get(swipe::handle_get_deck))
        .route("/api/v1/sessions/:id/deck/swipe", post(swipe::handle_swipe))
        .route("/api/v1/sessions/:id/deck/decide", post(swipe::handle_decide))
        .route(
            "/api/v1/sessions/:id/deck/restart",
            post(swipe::handle_restart_deck),
        )
        .route("/api/v1/sessions/:id/matches", get(swipe::handle_get_matches))
        .with_state(state)
}
