//! Remote row store port and its PostgREST adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

use crate::models::{Mode, ProfileRow};
use crate::profiles::PersistenceError;

const PROFILES_PATH: &str = "/rest/v1/profiles";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
/// PostgREST code for "single row requested, zero rows found".
const NO_ROWS_CODE: &str = "PGRST116";

/// Row-level access to the `profiles` relation.
///
/// `access_token` is the caller's bearer token; listing may run with the
/// anonymous key when no user token is available.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_for_owner(
        &self,
        access_token: &str,
        owner_id: &str,
        mode: Mode,
    ) -> Result<Option<ProfileRow>, PersistenceError>;

    async fn insert(&self, access_token: &str, row: &ProfileRow) -> Result<ProfileRow, PersistenceError>;

    async fn update(
        &self,
        access_token: &str,
        id: &str,
        row: &ProfileRow,
    ) -> Result<ProfileRow, PersistenceError>;

    /// All rows of a mode, newest first.
    async fn list_by_mode(
        &self,
        access_token: Option<&str>,
        mode: Mode,
    ) -> Result<Vec<ProfileRow>, PersistenceError>;
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, anon_key: String, timeout: Duration) -> Result<Self, PersistenceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn request(&self, method: Method, access_token: Option<&str>) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, PROFILES_PATH))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    async fn single_row(response: Response) -> Result<ProfileRow, PersistenceError> {
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json::<ProfileRow>().await?)
    }
}

#[async_trait]
impl ProfileStore for SupabaseStore {
    async fn find_for_owner(
        &self,
        access_token: &str,
        owner_id: &str,
        mode: Mode,
    ) -> Result<Option<ProfileRow>, PersistenceError> {
        let response = self
            .request(Method::GET, Some(access_token))
            .header("Accept", SINGLE_OBJECT)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{owner_id}")),
                ("mode", format!("eq.{mode}")),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(Some(response.json::<ProfileRow>().await?));
        }

        match api_error(response).await {
            PersistenceError::Api { code: Some(code), .. } if code == NO_ROWS_CODE => {
                debug!("No {mode} profile row for owner {owner_id}");
                Ok(None)
            }
            other => Err(other),
        }
    }

    async fn insert(&self, access_token: &str, row: &ProfileRow) -> Result<ProfileRow, PersistenceError> {
        let response = self
            .request(Method::POST, Some(access_token))
            .header("Accept", SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        Self::single_row(response).await
    }

    async fn update(
        &self,
        access_token: &str,
        id: &str,
        row: &ProfileRow,
    ) -> Result<ProfileRow, PersistenceError> {
        let response = self
            .request(Method::PATCH, Some(access_token))
            .header("Accept", SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .json(row)
            .send()
            .await?;
        Self::single_row(response).await
    }

    async fn list_by_mode(
        &self,
        access_token: Option<&str>,
        mode: Mode,
    ) -> Result<Vec<ProfileRow>, PersistenceError> {
        let response = self
            .request(Method::GET, access_token)
            .query(&[
                ("select", "*".to_string()),
                ("mode", format!("eq.{mode}")),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json::<Vec<ProfileRow>>().await?)
    }
}

async fn api_error(response: Response) -> PersistenceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<PostgrestError>(&body).ok();
    let (code, message) = match parsed {
        Some(e) => (e.code, e.message.unwrap_or(body)),
        None => (None, body),
    };
    PersistenceError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}
