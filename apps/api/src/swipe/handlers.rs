//! Axum route handlers for the swipe screen and the match list.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::navigation::View;
use crate::profiles::feed::load_deck;
use crate::sessions::handlers::session_handle;
use crate::sessions::{ClientSession, SessionHandle};
use crate::state::AppState;
use crate::swipe::engine::{exit_transition, resolve};
use crate::swipe::{DeckView, DragRelease, MatchList, SwipeDeck, SwipeDirection, SwipeOutcome};

#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub direction: SwipeDirection,
    #[serde(default)]
    pub viewport_width: f64,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    #[serde(flatten)]
    pub outcome: SwipeOutcome,
    /// The card was accepted and was not already in the match list.
    pub new_match: bool,
    pub deck: DeckView,
}

fn deck_mut(session: &mut ClientSession) -> Result<&mut SwipeDeck, AppError> {
    session
        .deck
        .as_mut()
        .ok_or_else(|| AppError::Conflict("The deck was reset; reload it".to_string()))
}

/// Loads the deck for the session's role if it is not loaded yet.
/// The session lock is released during the store call.
async fn ensure_deck(state: &AppState, handle: &SessionHandle) -> Result<(), AppError> {
    let (role, principal) = {
        let session = handle.lock().await;
        if session.deck.is_some() {
            return Ok(());
        }
        let principal = session.auth.principal().cloned().ok_or(AppError::Unauthorized)?;
        let role = session
            .role()
            .ok_or_else(|| AppError::Conflict("Pick a role before swiping".to_string()))?;
        (role, principal)
    };

    let items = load_deck(&state.profiles, Some(&principal), role).await?;

    let mut session = handle.lock().await;
    if session.deck.is_none() && session.role() == Some(role) {
        let deck = SwipeDeck::new(items);
        if deck.is_empty() {
            info!("No {} cards available for session {}", role.counterpart(), session.id);
        } else {
            debug!("Deck loaded with {} cards for session {}", deck.len(), session.id);
        }
        session.deck = Some(deck);
    }
    Ok(())
}

/// Applies a decision, records an accepted card, then waits out the exit
/// transition with the session unlocked before reporting the settled deck.
async fn commit_and_settle(
    handle: &SessionHandle,
    outcome: SwipeOutcome,
) -> Result<SwipeResponse, AppError> {
    let transition = match outcome {
        SwipeOutcome::Commit(transition) => transition,
        SwipeOutcome::SpringBack => {
            let mut guard = handle.lock().await;
            let deck = deck_mut(&mut guard)?.view(Instant::now());
            return Ok(SwipeResponse {
                outcome,
                new_match: false,
                deck,
            });
        }
    };

    let deadline = {
        let mut guard = handle.lock().await;
        let session = &mut *guard;
        if session.nav.view() != View::Swipe {
            return Err(AppError::Conflict(format!(
                "Cards can only be swiped on the swipe screen, not {}",
                session.nav.view()
            )));
        }
        let committed = deck_mut(session)?.commit(transition, Instant::now())?;
        let new_match = transition.direction == SwipeDirection::Accept
            && session.matches.add(committed.item.clone());
        if new_match {
            debug!("Session {} matched {}", session.id, committed.item.headline());
        }
        (committed.deadline, new_match)
    };
    let (deadline, new_match) = deadline;

    sleep_until(deadline).await;

    let mut guard = handle.lock().await;
    let deck = deck_mut(&mut guard)?.view(Instant::now());
    Ok(SwipeResponse {
        outcome,
        new_match,
        deck,
    })
}

/// GET /api/v1/sessions/:id/deck
pub async fn handle_get_deck(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeckView>, AppError> {
    let handle = session_handle(&state, id).await?;
    ensure_deck(&state, &handle).await?;
    let mut guard = handle.lock().await;
    let view = deck_mut(&mut guard)?.view(Instant::now());
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/deck/swipe
///
/// Resolves a released drag gesture. Sub-threshold releases spring back
/// without changing anything.
pub async fn handle_swipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(release): Json<DragRelease>,
) -> Result<Json<SwipeResponse>, AppError> {
    let handle = session_handle(&state, id).await?;
    ensure_deck(&state, &handle).await?;
    let response = commit_and_settle(&handle, resolve(&release)).await?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/deck/decide
///
/// Accept/reject buttons. Always commits.
pub async fn handle_decide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DecideRequest>,
) -> Result<Json<SwipeResponse>, AppError> {
    let handle = session_handle(&state, id).await?;
    ensure_deck(&state, &handle).await?;
    let outcome = SwipeOutcome::Commit(exit_transition(request.direction, request.viewport_width));
    let response = commit_and_settle(&handle, outcome).await?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/deck/restart
///
/// Back to the first card. Matches are kept.
pub async fn handle_restart_deck(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeckView>, AppError> {
    let handle = session_handle(&state, id).await?;
    ensure_deck(&state, &handle).await?;
    let mut guard = handle.lock().await;
    let deck = deck_mut(&mut guard)?;
    deck.restart();
    Ok(Json(deck.view(Instant::now())))
}

/// GET /api/v1/sessions/:id/matches
pub async fn handle_get_matches(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchList>, AppError> {
    let handle = session_handle(&state, id).await?;
    let matches = handle.lock().await.matches.clone();
    Ok(Json(matches))
}
