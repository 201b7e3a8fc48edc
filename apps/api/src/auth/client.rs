//! Identity provider port and its GoTrue adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthError;

/// OAuth provider used for sign-in.
pub const OAUTH_PROVIDER: &str = "linkedin";
pub const OAUTH_SCOPES: &str = "r_liteprofile r_emailaddress";

/// A user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token to its user. A rejected token is `InvalidSession`.
    async fn user_for_token(&self, access_token: &str) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Where to send the browser to start the OAuth redirect flow.
    fn authorize_url(&self, redirect_to: &str) -> String;
}

#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(base_url: &str, anon_key: String, timeout: Duration) -> Result<Self, AuthError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn user_for_token(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(response.json::<AuthUser>().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidSession),
            s => Err(AuthError::Api {
                status: s.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            debug!("Signed out at identity provider (status {status})");
            return Ok(());
        }
        Err(AuthError::Api {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }

    fn authorize_url(&self, redirect_to: &str) -> String {
        let base = format!("{}/auth/v1/authorize", self.base_url);
        let params = [
            ("provider", OAUTH_PROVIDER),
            ("redirect_to", redirect_to),
            ("scopes", OAUTH_SCOPES),
        ];
        match Url::parse_with_params(&base, &params) {
            Ok(url) => url.to_string(),
            Err(_) => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn auth_for(server: &MockServer) -> SupabaseAuth {
        SupabaseAuth::new(&server.base_url(), "anon-key".to_string(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_user_for_token_returns_user_with_metadata() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/auth/v1/user")
                    .header("authorization", "Bearer tok-1");
                then.status(200).json_body(json!({
                    "id": "user-1",
                    "email": "jane@example.com",
                    "user_metadata": {"full_name": "Jane Doe"}
                }));
            })
            .await;

        let user = auth_for(&server).user_for_token("tok-1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email.as_deref(), Some("jane@example.com"));
        assert_eq!(user.user_metadata["full_name"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_rejected_token_is_invalid_session() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/auth/v1/user");
                then.status(401).json_body(json!({"msg": "invalid JWT"}));
            })
            .await;

        let err = auth_for(&server).user_for_token("stale").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidSession));
    }

    #[tokio::test]
    async fn test_sign_out_posts_logout() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/logout");
                then.status(204);
            })
            .await;

        auth_for(&server).sign_out("tok-1").await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_authorize_url_names_provider_and_redirect() {
        let auth = SupabaseAuth::new(
            "https://abc.supabase.co/",
            "anon".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        let url = auth.authorize_url("https://app.example/callback");
        assert!(url.starts_with("https://abc.supabase.co/auth/v1/authorize?"));
        assert!(url.contains("provider=linkedin"));
        assert!(url.contains("redirect_to=https%3A%2F%2Fapp.example%2Fcallback"));
    }
}
