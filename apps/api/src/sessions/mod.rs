// Per-client session state and its registry.
// Each session owns its auth context, screen, draft, capture, deck and matches.
// Handlers lock a session for state changes and release it across network calls.

pub mod handlers;
pub mod registry;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::session::PrincipalSummary;
use crate::auth::SessionContext;
use crate::models::{Mode, Profile};
use crate::navigation::{Navigator, View};
use crate::profiles::draft::ProfileDraft;
use crate::swipe::{MatchList, SwipeDeck};
use crate::voice::{CaptureState, TranscriptCapture};

pub use registry::{SessionHandle, SessionRegistry};

/// Single-flight flag for one kind of async operation.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

/// Clears its flag when dropped, including on early return or error.
#[derive(Debug)]
pub struct InFlightGuard(Arc<AtomicBool>);

impl InFlight {
    /// `None` when the operation is already running.
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(self.0.clone()))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct ClientSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub auth: SessionContext,
    pub nav: Navigator,
    pub draft: Option<ProfileDraft>,
    pub capture: TranscriptCapture,
    /// The saved profile for the current role.
    pub profile: Option<Profile>,
    /// Loaded lazily on first view of the swipe screen.
    pub deck: Option<SwipeDeck>,
    pub matches: MatchList,
    /// Last inline notice (extraction fallback, capture failure).
    pub advisory: Option<String>,
    pub extracting: InFlight,
    pub saving: InFlight,
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            auth: SessionContext::new(),
            nav: Navigator::new(),
            draft: None,
            capture: TranscriptCapture::new(),
            profile: None,
            deck: None,
            matches: MatchList::new(),
            advisory: None,
            extracting: InFlight::default(),
            saving: InFlight::default(),
        }
    }

    pub fn role(&self) -> Option<Mode> {
        self.nav.role()
    }

    /// Drops everything tied to the signed-in principal.
    pub fn reset_for_sign_out(&mut self) {
        self.draft = None;
        self.capture = TranscriptCapture::new();
        self.profile = None;
        self.deck = None;
        self.matches.clear();
        self.advisory = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            view: self.nav.view(),
            role: self.role(),
            principal: self.auth.principal().map(|p| p.summary()),
            profile: self.profile.clone(),
            has_draft: self.draft.is_some(),
            capture: self.capture.state(),
            match_count: self.matches.len(),
            extracting: self.extracting.is_active(),
            saving: self.saving.is_active(),
            advisory: self.advisory.clone(),
        }
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub view: View,
    pub role: Option<Mode>,
    pub principal: Option<PrincipalSummary>,
    pub profile: Option<Profile>,
    pub has_draft: bool,
    pub capture: CaptureState,
    pub match_count: usize,
    pub extracting: bool,
    pub saving: bool,
    pub advisory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_admits_one_holder_at_a_time() {
        let flag = InFlight::default();
        let guard = flag.try_begin().expect("first begin succeeds");
        assert!(flag.is_active());
        assert!(flag.try_begin().is_none());

        drop(guard);
        assert!(!flag.is_active());
        assert!(flag.try_begin().is_some());
    }

    #[test]
    fn test_in_flight_is_shared_between_clones() {
        let flag = InFlight::default();
        let clone = flag.clone();
        let _guard = flag.try_begin().unwrap();
        assert!(clone.try_begin().is_none());
    }

    #[test]
    fn test_new_session_starts_signed_out() {
        let session = ClientSession::new();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.view, View::Unauthenticated);
        assert!(snapshot.principal.is_none());
        assert_eq!(snapshot.match_count, 0);
        assert!(!snapshot.extracting);
    }
}
