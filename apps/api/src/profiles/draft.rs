//! Profile draft: the three-step creation flow.
//!
//! Basic info, then an image, then the narrative details (typed or
//! extracted from voice). `complete` turns a finished draft into a `Profile`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::session::IdentityMetadata;
use crate::models::{Mode, Profile, ProfileDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStep {
    BasicInfo,
    Image,
    Narrative,
    Ready,
}

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("'{0}' is required")]
    MissingField(&'static str),

    #[error("An image is required")]
    MissingImage,

    #[error("Profile details are required; describe yourself or your role first")]
    MissingNarrative,

    #[error("Details are for a {found} profile but this draft is for a {expected} profile")]
    ModeMismatch { expected: Mode, found: Mode },
}

/// Partial edit sent by the client. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    pub name: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub details: Option<ProfileDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDraft {
    pub mode: Mode,
    pub name: String,
    pub title: String,
    pub location: String,
    pub image: Option<String>,
    pub details: Option<ProfileDetails>,
    /// Set when editing a saved profile.
    pub profile_id: Option<String>,
    #[serde(skip)]
    owner_id: Option<String>,
    #[serde(skip)]
    created_at: Option<DateTime<Utc>>,
}

impl ProfileDraft {
    /// New draft pre-filled from identity-provider hints.
    pub fn seeded(mode: Mode, metadata: Option<&IdentityMetadata>) -> Self {
        let hint = |pick: Option<&String>| pick.cloned().unwrap_or_default();
        let personal = mode == Mode::Seeker;
        Self {
            mode,
            name: hint(metadata.and_then(|m| m.full_name.as_ref()).filter(|_| personal)),
            title: hint(metadata.and_then(|m| m.headline.as_ref()).filter(|_| personal)),
            location: hint(metadata.and_then(|m| m.location.as_ref())),
            image: metadata
                .and_then(|m| m.avatar_url.clone())
                .filter(|_| personal),
            details: None,
            profile_id: None,
            owner_id: None,
            created_at: None,
        }
    }

    /// Edit draft for a saved profile.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            mode: profile.mode(),
            name: profile.name.clone(),
            title: profile.title.clone(),
            location: profile.location.clone(),
            image: profile.image.clone(),
            details: Some(profile.details.clone()),
            profile_id: profile.id.clone(),
            owner_id: profile.owner_id.clone(),
            created_at: profile.created_at,
        }
    }

    pub fn apply(&mut self, update: DraftUpdate) -> Result<(), DraftError> {
        if let Some(details) = update.details {
            self.set_details(details)?;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(image) = update.image {
            self.image = Some(image).filter(|i| !i.trim().is_empty());
        }
        Ok(())
    }

    pub fn set_details(&mut self, details: ProfileDetails) -> Result<(), DraftError> {
        if details.mode() != self.mode {
            return Err(DraftError::ModeMismatch {
                expected: self.mode,
                found: details.mode(),
            });
        }
        self.details = Some(details);
        Ok(())
    }

    /// First step that is not yet satisfied.
    pub fn current_step(&self) -> DraftStep {
        match self.check() {
            Ok(()) => DraftStep::Ready,
            Err(DraftError::MissingField(_)) => DraftStep::BasicInfo,
            Err(DraftError::MissingImage) => DraftStep::Image,
            Err(_) => DraftStep::Narrative,
        }
    }

    pub fn complete(&self) -> Result<Profile, DraftError> {
        self.check()?;
        let details = self.details.clone().ok_or(DraftError::MissingNarrative)?;
        Ok(Profile {
            id: self.profile_id.clone(),
            owner_id: self.owner_id.clone(),
            name: self.name.trim().to_string(),
            title: self.title.trim().to_string(),
            location: self.location.trim().to_string(),
            image: self.image.clone(),
            details,
            created_at: self.created_at,
            updated_at: None,
        })
    }

    fn check(&self) -> Result<(), DraftError> {
        for (field, value) in [
            ("name", &self.name),
            ("title", &self.title),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(DraftError::MissingField(field));
            }
        }
        if self.image.is_none() {
            return Err(DraftError::MissingImage);
        }
        match &self.details {
            None => Err(DraftError::MissingNarrative),
            Some(d) if d.mode() != self.mode => Err(DraftError::ModeMismatch {
                expected: self.mode,
                found: d.mode(),
            }),
            Some(_) => Ok(()),
        }
    }
}
