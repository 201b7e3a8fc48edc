//! Axum route handlers for session lifecycle, sign-in and screen navigation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Principal;
use crate::errors::AppError;
use crate::models::Mode;
use crate::navigation::{NavEvent, ScreenRequest};
use crate::profiles::draft::ProfileDraft;
use crate::sessions::{SessionHandle, SessionSnapshot};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Token persisted by the client from an earlier sign-in.
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub mode: Mode,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub to: ScreenRequest,
}

fn already_signed_in() -> AppError {
    AppError::Conflict("Already signed in; sign out first".to_string())
}

pub(crate) async fn session_handle(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// Looks for a saved profile after sign-in, seeker first. The first one found
/// sets the role and skips straight to swiping. Failures leave the session on
/// role selection.
pub(crate) async fn auto_load(state: &AppState, handle: &SessionHandle) {
    let principal = {
        let session = handle.lock().await;
        match session.auth.principal() {
            Some(p) if !p.is_demo() => p.clone(),
            _ => return,
        }
    };

    let mut found = None;
    for mode in [Mode::Seeker, Mode::Employer] {
        match state.profiles.load(Some(&principal), mode).await {
            Ok(Some(profile)) => {
                found = Some(profile);
                break;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Could not check for a saved {mode} profile: {e}");
                return;
            }
        }
    }
    let Some(profile) = found else {
        return;
    };

    let mut guard = handle.lock().await;
    let session = &mut *guard;
    if session.auth.principal().map(Principal::id) != Some(principal.id()) {
        return;
    }
    let mode = profile.mode();
    if session.nav.apply(NavEvent::ExistingProfileFound(mode)).is_ok() {
        info!("Found saved {mode} profile for {}; skipping setup", principal.id());
        session.profile = Some(profile);
    }
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let (id, handle) = state.sessions.create().await;

    let hydrated = {
        let mut guard = handle.lock().await;
        let session = &mut *guard;
        let principal = session
            .auth
            .hydrate(state.identity.as_deref(), request.access_token.as_deref())
            .await?;
        let hydrated = principal.is_some();
        if hydrated {
            session.nav.apply(NavEvent::SignedIn)?;
        }
        hydrated
    };
    if hydrated {
        auto_load(&state, &handle).await;
    }

    info!("Session {id} opened");
    let snapshot = handle.lock().await.snapshot();
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session_handle(&state, id).await?;
    let snapshot = handle.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/sign-in
///
/// Completes the OAuth redirect flow with the token the provider returned.
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    if request.access_token.trim().is_empty() {
        return Err(AppError::Validation("access_token cannot be empty".to_string()));
    }
    let handle = session_handle(&state, id).await?;
    if handle.lock().await.auth.is_signed_in() {
        return Err(already_signed_in());
    }

    let principal = Principal::authenticate(state.identity.as_deref(), &request.access_token).await?;

    {
        let mut guard = handle.lock().await;
        let session = &mut *guard;
        if session.auth.is_signed_in() {
            return Err(already_signed_in());
        }
        session.auth.sign_in(principal);
        session.nav.apply(NavEvent::SignedIn)?;
    }
    auto_load(&state, &handle).await;

    let snapshot = handle.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/demo
pub async fn handle_demo_sign_in(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    if session.auth.is_signed_in() {
        return Err(already_signed_in());
    }
    session.auth.sign_in_demo();
    session.nav.apply(NavEvent::SignedIn)?;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session_handle(&state, id).await?;
    let (signed_out, snapshot) = {
        let mut guard = handle.lock().await;
        let session = &mut *guard;
        let signed_out = session.auth.sign_out();
        session.nav.apply(NavEvent::SignedOut)?;
        session.reset_for_sign_out();
        (signed_out, session.snapshot())
    };

    if let Some(principal) = signed_out {
        principal.revoke(state.identity.as_deref()).await;
    }
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/role
///
/// Picks seeker or employer and opens a draft seeded from provider metadata.
pub async fn handle_select_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RoleRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let metadata = session
        .auth
        .principal()
        .ok_or(AppError::Unauthorized)?
        .metadata()
        .clone();

    session.nav.apply(NavEvent::RoleSelected(request.mode))?;
    session.draft = Some(ProfileDraft::seeded(request.mode, Some(&metadata)));
    session.profile = None;
    session.deck = None;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;

    let event = NavEvent::from(request.to);
    session.nav.apply(event)?;

    if event == NavEvent::EditProfile {
        let metadata = session.auth.principal().map(|p| p.metadata());
        session.draft = match (&session.profile, session.nav.role()) {
            (Some(profile), _) => Some(ProfileDraft::from_profile(profile)),
            (None, Some(mode)) => Some(ProfileDraft::seeded(mode, metadata)),
            (None, None) => None,
        };
    }
    Ok(Json(session.snapshot()))
}
