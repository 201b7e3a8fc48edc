//! Per-client session context: who is signed in, and how.
//!
//! Constructed explicitly for each client session, hydrated from a stored
//! token on init and cleared on sign-out.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::auth::client::{AuthUser, IdentityProvider};
use crate::auth::AuthError;

pub const DEMO_DISPLAY_NAME: &str = "Demo User";
pub const DEMO_EMAIL: &str = "demo@jobz.app";
pub const DEFAULT_AVATAR_URL: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=400&h=400&fit=crop&q=80";
const DEMO_ID_PREFIX: &str = "demo-user-";

/// Profile hints supplied by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentityMetadata {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub provider_id: Option<String>,
    pub profile_url: Option<String>,
}

impl IdentityMetadata {
    pub fn from_user_metadata(raw: &Value) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| raw.get(*k).and_then(Value::as_str))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        IdentityMetadata {
            full_name: text(&["full_name", "name"]),
            avatar_url: text(&["avatar_url", "picture"]),
            headline: text(&["headline"]),
            location: raw
                .get("location")
                .and_then(|l| l.get("name").or(Some(l)))
                .and_then(Value::as_str)
                .map(String::from),
            provider_id: text(&["sub", "provider_id"]),
            profile_url: text(&["profile_url"]),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Principal {
    Authenticated {
        user_id: String,
        email: Option<String>,
        access_token: String,
        metadata: IdentityMetadata,
    },
    /// Locally synthesized stand-in. Never touches the remote store.
    Demo {
        user_id: String,
        metadata: IdentityMetadata,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Authenticated,
    Demo,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipalSummary {
    pub id: String,
    pub kind: PrincipalKind,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub metadata: IdentityMetadata,
}

impl Principal {
    fn from_user(user: AuthUser, access_token: &str) -> Self {
        Principal::Authenticated {
            metadata: IdentityMetadata::from_user_metadata(&user.user_metadata),
            user_id: user.id,
            email: user.email,
            access_token: access_token.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Principal::Authenticated { user_id, .. } | Principal::Demo { user_id, .. } => user_id,
        }
    }

    /// Resolves the token the provider issued at the end of the OAuth
    /// redirect flow.
    pub async fn authenticate(
        identity: Option<&dyn IdentityProvider>,
        access_token: &str,
    ) -> Result<Self, AuthError> {
        let identity = identity.ok_or(AuthError::NotConfigured)?;
        let user = identity.user_for_token(access_token).await?;
        Ok(Principal::from_user(user, access_token))
    }

    /// Logs out at the provider. Failures are logged, not surfaced; demo
    /// principals never reach the provider.
    pub async fn revoke(&self, identity: Option<&dyn IdentityProvider>) {
        if let (Principal::Authenticated { access_token, user_id, .. }, Some(identity)) =
            (self, identity)
        {
            if let Err(e) = identity.sign_out(access_token).await {
                warn!("Provider sign-out failed for {user_id}: {e}");
            }
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        match self {
            Principal::Authenticated { access_token, .. } => Some(access_token),
            Principal::Demo { .. } => None,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Principal::Demo { .. })
    }

    pub fn metadata(&self) -> &IdentityMetadata {
        match self {
            Principal::Authenticated { metadata, .. } | Principal::Demo { metadata, .. } => metadata,
        }
    }

    pub fn summary(&self) -> PrincipalSummary {
        let (kind, email) = match self {
            Principal::Authenticated { email, .. } => (PrincipalKind::Authenticated, email.clone()),
            Principal::Demo { .. } => (PrincipalKind::Demo, Some(DEMO_EMAIL.to_string())),
        };
        PrincipalSummary {
            id: self.id().to_string(),
            kind,
            display_name: self.metadata().full_name.clone(),
            email,
            metadata: self.metadata().clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionContext {
    principal: Option<Principal>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.principal.is_some()
    }

    /// Restores a stored session. A missing provider or a stale token leaves
    /// the context signed out instead of failing.
    pub async fn hydrate(
        &mut self,
        identity: Option<&dyn IdentityProvider>,
        stored_token: Option<&str>,
    ) -> Result<Option<&Principal>, AuthError> {
        let Some(token) = stored_token.filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };
        let Some(identity) = identity else {
            warn!("Stored session ignored: authentication service not configured");
            return Ok(None);
        };

        match identity.user_for_token(token).await {
            Ok(user) => {
                info!("Hydrated session for user {}", user.id);
                self.principal = Some(Principal::from_user(user, token));
                Ok(self.principal.as_ref())
            }
            Err(AuthError::InvalidSession) => {
                warn!("Stored session token was rejected; starting signed out");
                self.principal = None;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Adopts a principal resolved by [`Principal::authenticate`].
    pub fn sign_in(&mut self, principal: Principal) -> &Principal {
        info!("User {} signed in", principal.id());
        self.principal.insert(principal)
    }

    pub fn sign_in_demo(&mut self) -> &Principal {
        let user_id = format!("{DEMO_ID_PREFIX}{}", Utc::now().timestamp_millis());
        info!("Demo session started as {user_id}");
        self.principal.insert(Principal::Demo {
            user_id,
            metadata: IdentityMetadata {
                full_name: Some(DEMO_DISPLAY_NAME.to_string()),
                avatar_url: Some(DEFAULT_AVATAR_URL.to_string()),
                ..IdentityMetadata::default()
            },
        })
    }

    /// Clears the principal and hands it back so the caller can revoke it
    /// at the provider without holding the session.
    pub fn sign_out(&mut self) -> Option<Principal> {
        let principal = self.principal.take()?;
        info!("Session for {} signed out", principal.id());
        Some(principal)
    }
}
