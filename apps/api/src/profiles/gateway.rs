//! Profile Persistence Gateway.
//!
//! Saves and loads one profile per (owner, mode). When the row store is not
//! configured, or the caller is not an authenticated principal, saves are
//! answered locally with a synthesized record and no remote call is made.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::auth::Principal;
use crate::models::profile::RowShapeError;
use crate::models::{Mode, Profile, ProfileRow};
use crate::profiles::store::ProfileStore;
use crate::profiles::PersistenceError;

pub const MOCK_OWNER: &str = "mock-user";
pub const LOCAL_OWNER: &str = "local-user";

#[derive(Clone)]
pub struct ProfileGateway {
    store: Option<Arc<dyn ProfileStore>>,
}

impl ProfileGateway {
    pub fn new(store: Option<Arc<dyn ProfileStore>>) -> Self {
        Self { store }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Upserts `profile` by (principal, mode) and returns the stored record.
    pub async fn save(
        &self,
        principal: Option<&Principal>,
        mut profile: Profile,
    ) -> Result<Profile, PersistenceError> {
        let millis = Utc::now().timestamp_millis();

        let Some(store) = self.store.as_ref() else {
            warn!("Profile store not configured. Returning mock profile.");
            profile.id = Some(format!("mock-{millis}"));
            profile.owner_id = Some(MOCK_OWNER.to_string());
            return Ok(profile);
        };

        let (user_id, token) = match principal {
            Some(Principal::Authenticated { user_id, access_token, .. }) => (user_id, access_token),
            Some(Principal::Demo { user_id, .. }) => {
                info!("Demo session: keeping {} profile local", profile.mode());
                return Ok(synthesized(profile, format!("demo-{millis}"), user_id));
            }
            None => {
                warn!("No authenticated user. Saving profile locally.");
                return Ok(synthesized(profile, format!("local-{millis}"), LOCAL_OWNER));
            }
        };

        let mode = profile.mode();
        let mut row = profile.into_row();
        row.id = None;
        row.user_id = Some(user_id.clone());
        row.created_at = None;
        row.updated_at = None;

        let stored = match store.find_for_owner(token, user_id, mode).await? {
            Some(existing) => {
                let id = existing.id.ok_or(RowShapeError::MissingField("id"))?;
                row.updated_at = Some(Utc::now());
                let updated = store.update(token, &id, &row).await?;
                info!("Updated {mode} profile {id} for user {user_id}");
                updated
            }
            None => {
                let inserted = store.insert(token, &row).await?;
                info!("Created {mode} profile for user {user_id}");
                inserted
            }
        };

        Ok(Profile::try_from(stored)?)
    }

    /// The caller's saved profile for `mode`, if any.
    ///
    /// Returns `None` for unconfigured stores and for non-authenticated
    /// principals. Transport failures propagate.
    pub async fn load(
        &self,
        principal: Option<&Principal>,
        mode: Mode,
    ) -> Result<Option<Profile>, PersistenceError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(None);
        };
        let Some(Principal::Authenticated { user_id, access_token, .. }) = principal else {
            return Ok(None);
        };

        match store.find_for_owner(access_token, user_id, mode).await? {
            Some(row) => Ok(Some(Profile::try_from(row)?)),
            None => Ok(None),
        }
    }

    /// Every profile of `mode`, newest first. Malformed rows are skipped.
    pub async fn list(
        &self,
        principal: Option<&Principal>,
        mode: Mode,
    ) -> Result<Vec<Profile>, PersistenceError> {
        let Some(store) = self.store.as_ref() else {
            warn!("Profile store not configured. Cannot list {mode} profiles.");
            return Ok(Vec::new());
        };

        let token = principal.and_then(Principal::access_token);
        let rows = store.list_by_mode(token, mode).await?;
        let total = rows.len();
        let profiles: Vec<Profile> = rows.into_iter().filter_map(validated).collect();
        if profiles.len() < total {
            warn!("Skipped {} malformed {mode} rows", total - profiles.len());
        }
        Ok(profiles)
    }
}

fn synthesized(mut profile: Profile, id: String, owner: &str) -> Profile {
    let now = Utc::now();
    profile.id = Some(id);
    profile.owner_id = Some(owner.to_string());
    profile.created_at = Some(now);
    profile.updated_at = Some(now);
    profile
}

fn validated(row: ProfileRow) -> Option<Profile> {
    let id = row.id.clone();
    match Profile::try_from(row) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("Ignoring profile row {id:?}: {e}");
            None
        }
    }
}
