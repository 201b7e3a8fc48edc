//! Axum route handlers for the profile draft and the saved profile.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Principal;
use crate::errors::AppError;
use crate::extraction::Extraction;
use crate::models::Profile;
use crate::navigation::NavEvent;
use crate::profiles::draft::{DraftStep, DraftUpdate, ProfileDraft};
use crate::sessions::handlers::session_handle;
use crate::sessions::{SessionHandle, SessionSnapshot};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DraftView {
    pub draft: ProfileDraft,
    pub step: DraftStep,
}

impl From<&ProfileDraft> for DraftView {
    fn from(draft: &ProfileDraft) -> Self {
        Self {
            draft: draft.clone(),
            step: draft.current_step(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DraftExtractRequest {
    pub text: String,
}

fn no_draft() -> AppError {
    AppError::NotFound("No profile draft in progress".to_string())
}

/// Runs extraction for the session's draft and stores the details on it.
///
/// The session lock is released while the model is called. A second call
/// while one is running is a conflict.
pub(crate) async fn extract_into_draft(
    state: &AppState,
    handle: &SessionHandle,
    text: &str,
) -> Result<Extraction, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let (mode, _flight) = {
        let mut guard = handle.lock().await;
        let session = &mut *guard;
        let mode = session.draft.as_ref().ok_or_else(no_draft)?.mode;
        let flight = session
            .extracting
            .try_begin()
            .ok_or_else(|| AppError::Conflict("Extraction is already in progress".to_string()))?;
        (mode, flight)
    };

    let extraction = state.extractor.extract(text, mode).await;

    let mut guard = handle.lock().await;
    let session = &mut *guard;
    match session.draft.as_mut().filter(|d| d.mode == mode) {
        Some(draft) => draft.set_details(extraction.details.clone())?,
        None => warn!("Draft changed while extracting; discarding {mode} details"),
    }
    session.advisory = extraction.advisory.clone();
    Ok(extraction)
}

/// GET /api/v1/sessions/:id/draft
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftView>, AppError> {
    let handle = session_handle(&state, id).await?;
    let session = handle.lock().await;
    let draft = session.draft.as_ref().ok_or_else(no_draft)?;
    Ok(Json(DraftView::from(draft)))
}

/// PATCH /api/v1/sessions/:id/draft
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<DraftUpdate>,
) -> Result<Json<DraftView>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    let draft = session.draft.as_mut().ok_or_else(no_draft)?;
    draft.apply(update)?;
    Ok(Json(DraftView::from(&*draft)))
}

/// POST /api/v1/sessions/:id/draft/extract
///
/// Typed alternative to voice capture. Never fails on upstream AI errors;
/// the response carries an advisory when the keyword fallback was used.
pub async fn handle_extract_into_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DraftExtractRequest>,
) -> Result<Json<Extraction>, AppError> {
    let handle = session_handle(&state, id).await?;
    let extraction = extract_into_draft(&state, &handle, &request.text).await?;
    Ok(Json(extraction))
}

/// GET /api/v1/sessions/:id/profile
///
/// The saved profile for the session's role, loaded from the store on first
/// request.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, AppError> {
    let handle = session_handle(&state, id).await?;
    let (role, principal) = {
        let session = handle.lock().await;
        if let Some(profile) = &session.profile {
            return Ok(Json(profile.clone()));
        }
        let role = session
            .role()
            .ok_or_else(|| AppError::NotFound("No role selected".to_string()))?;
        (role, session.auth.principal().cloned())
    };

    let profile = state
        .profiles
        .load(principal.as_ref(), role)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No saved {role} profile")))?;

    let mut session = handle.lock().await;
    if session.role() == Some(role) {
        session.profile = Some(profile.clone());
    }
    Ok(Json(profile))
}

/// POST /api/v1/sessions/:id/profile/complete
///
/// Validates the draft, saves it through the persistence gateway and moves
/// the session on to swiping.
pub async fn handle_complete_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session_handle(&state, id).await?;

    let (profile, principal, _flight) = {
        let mut guard = handle.lock().await;
        let session = &mut *guard;
        let draft = session.draft.as_ref().ok_or_else(no_draft)?;
        session.nav.clone().apply(NavEvent::ProfileCompleted)?;
        let profile = draft.complete()?;
        let flight = session
            .saving
            .try_begin()
            .ok_or_else(|| AppError::Conflict("Profile is already being saved".to_string()))?;
        (profile, session.auth.principal().cloned(), flight)
    };
    let owner = principal.as_ref().map(|p| p.id().to_string());
    let mode = profile.mode();

    let saved = state.profiles.save(principal.as_ref(), profile).await?;

    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let same_owner = session.auth.principal().map(Principal::id) == owner.as_deref();
    let same_draft = session.draft.as_ref().map(|d| d.mode) == Some(mode);
    if !same_owner || !same_draft {
        warn!(
            "Session {} changed while saving {mode} profile {:?}; leaving it as is",
            session.id, saved.id
        );
        return Err(AppError::Conflict(
            "The session changed while the profile was being saved".to_string(),
        ));
    }
    session.nav.apply(NavEvent::ProfileCompleted)?;
    info!(
        "Saved {} profile {:?} for session {}",
        saved.mode(),
        saved.id,
        session.id
    );
    session.profile = Some(saved);
    session.draft = None;
    session.deck = None;
    Ok(Json(session.snapshot()))
}
