//! Axum route handlers for voice capture on the create-profile screen.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::Extraction;
use crate::profiles::handlers::extract_into_draft;
use crate::sessions::handlers::session_handle;
use crate::sessions::SessionSnapshot;
use crate::state::AppState;
use crate::voice::{CaptureFailure, CaptureOutcome, TranscriptSegment};

#[derive(Debug, Deserialize)]
pub struct SegmentsRequest {
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptView {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub capture: CaptureOutcome,
    /// Present when a transcript was captured and sent for extraction.
    pub extraction: Option<Extraction>,
}

/// POST /api/v1/sessions/:id/capture/start
pub async fn handle_start_capture(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    if session.draft.is_none() {
        return Err(AppError::NotFound("No profile draft in progress".to_string()));
    }
    session.capture.start()?;
    session.advisory = None;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/capture/segments
pub async fn handle_push_segments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SegmentsRequest>,
) -> Result<Json<TranscriptView>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    for segment in request.segments {
        session.capture.push(segment)?;
    }
    Ok(Json(TranscriptView {
        transcript: session.capture.transcript(),
    }))
}

/// POST /api/v1/sessions/:id/capture/stop
///
/// Stops listening and hands a non-empty transcript to extraction.
pub async fn handle_stop_capture(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StopResponse>, AppError> {
    let handle = session_handle(&state, id).await?;
    let capture = {
        let mut session = handle.lock().await;
        let outcome = session.capture.stop()?;
        if outcome.advisory.is_some() {
            session.advisory = outcome.advisory.clone();
        }
        outcome
    };

    let extraction = match &capture.transcript {
        Some(text) => Some(extract_into_draft(&state, &handle, text).await?),
        None => None,
    };
    Ok(Json(StopResponse {
        capture,
        extraction,
    }))
}

/// POST /api/v1/sessions/:id/capture/error
///
/// The device recognizer gave up. Capture returns to idle and the advisory
/// is shown inline.
pub async fn handle_capture_error(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(failure): Json<CaptureFailure>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut guard = handle.lock().await;
    let session = &mut *guard;
    let advisory = session.capture.fail(&failure);
    session.advisory = Some(advisory);
    Ok(Json(session.snapshot()))
}
