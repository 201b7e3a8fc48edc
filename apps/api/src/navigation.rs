//! View/Session State Machine: which screen a session is on.
//!
//! ```text
//! unauthenticated -(sign in)-> role_unselected -(role)-> create -(complete)-> swipe
//! role_unselected -(saved profile found)-> swipe
//! swipe <-> matches, swipe <-> profile, profile -(edit)-> create
//! any -(sign out)-> unauthenticated
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Unauthenticated,
    RoleUnselected,
    Create,
    Swipe,
    Matches,
    Profile,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Unauthenticated => "unauthenticated",
            View::RoleUnselected => "role_unselected",
            View::Create => "create",
            View::Swipe => "swipe",
            View::Matches => "matches",
            View::Profile => "profile",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    SignedIn,
    SignedOut,
    RoleSelected(Mode),
    /// Auto-load on auth found a saved profile for this mode.
    ExistingProfileFound(Mode),
    ProfileCompleted,
    ShowMatches,
    ShowProfile,
    BackToSwipe,
    EditProfile,
}

impl NavEvent {
    pub fn name(&self) -> &'static str {
        match self {
            NavEvent::SignedIn => "signed_in",
            NavEvent::SignedOut => "signed_out",
            NavEvent::RoleSelected(_) => "role_selected",
            NavEvent::ExistingProfileFound(_) => "existing_profile_found",
            NavEvent::ProfileCompleted => "profile_completed",
            NavEvent::ShowMatches => "show_matches",
            NavEvent::ShowProfile => "show_profile",
            NavEvent::BackToSwipe => "back_to_swipe",
            NavEvent::EditProfile => "edit_profile",
        }
    }
}

/// Screens a client may ask for directly. Everything else is reached through
/// sign-in, role selection and profile completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenRequest {
    Swipe,
    Matches,
    Profile,
    Create,
}

impl From<ScreenRequest> for NavEvent {
    fn from(request: ScreenRequest) -> Self {
        match request {
            ScreenRequest::Swipe => NavEvent::BackToSwipe,
            ScreenRequest::Matches => NavEvent::ShowMatches,
            ScreenRequest::Profile => NavEvent::ShowProfile,
            ScreenRequest::Create => NavEvent::EditProfile,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum NavigationError {
    #[error("Cannot handle '{event}' while on the {from} screen")]
    InvalidTransition { from: View, event: &'static str },
}

#[derive(Debug, Clone)]
pub struct Navigator {
    view: View,
    role: Option<Mode>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            view: View::Unauthenticated,
            role: None,
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn role(&self) -> Option<Mode> {
        self.role
    }

    pub fn apply(&mut self, event: NavEvent) -> Result<View, NavigationError> {
        let next = match (self.view, event) {
            (_, NavEvent::SignedOut) => {
                self.role = None;
                View::Unauthenticated
            }
            (View::Unauthenticated, NavEvent::SignedIn) => View::RoleUnselected,
            (View::RoleUnselected, NavEvent::RoleSelected(mode)) => {
                self.role = Some(mode);
                View::Create
            }
            (View::RoleUnselected, NavEvent::ExistingProfileFound(mode)) => {
                self.role = Some(mode);
                View::Swipe
            }
            (View::Create, NavEvent::ProfileCompleted) => View::Swipe,
            (View::Swipe, NavEvent::ShowMatches) => View::Matches,
            (View::Swipe, NavEvent::ShowProfile) => View::Profile,
            (View::Matches | View::Profile, NavEvent::BackToSwipe) => View::Swipe,
            (View::Profile, NavEvent::EditProfile) => View::Create,
            (from, event) => {
                return Err(NavigationError::InvalidTransition {
                    from,
                    event: event.name(),
                })
            }
        };
        self.view = next;
        Ok(next)
    }
}
