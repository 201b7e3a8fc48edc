use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use tracing::warn;

/// Model ids tried in order when `GEMINI_MODELS` is not set.
pub const DEFAULT_GEMINI_MODELS: &[&str] = &[
    "gemini-1.5-pro",
    "gemini-pro",
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash",
];

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection details for the hosted auth + row store.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

/// Application configuration loaded from environment variables.
/// Every external collaborator is optional: a missing credential narrows
/// capability instead of aborting startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Option<BackendConfig>,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_models: Vec<String>,
    pub oauth_redirect_url: Option<String>,
    pub ai_timeout: Duration,
    pub store_timeout: Duration,
    pub port: u16,
    pub session_idle: Duration,
}

impl Config {
    /// Reads the process environment. Call after logging is installed so
    /// the capability warnings below are recorded.
    pub fn from_env() -> Result<Self> {
        let backend = match (optional_env("SUPABASE_URL"), optional_env("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) if is_http_url(&url) => Some(BackendConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            (Some(url), Some(_)) => {
                warn!("Invalid SUPABASE_URL format: {url}. Backend features are disabled.");
                None
            }
            (url, key) => {
                warn!(
                    "Backend environment variables are not set (SUPABASE_URL: {}, SUPABASE_ANON_KEY: {}). \
                     Authentication and persistence will not work.",
                    if url.is_some() { "set" } else { "missing" },
                    if key.is_some() { "set" } else { "missing" },
                );
                None
            }
        };

        let gemini_api_key = optional_env("GEMINI_API_KEY");
        if gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY is not set. Profile extraction will use the keyword fallback.");
        }

        Ok(Config {
            backend,
            gemini_api_key,
            gemini_base_url: optional_env("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_models: optional_env("GEMINI_MODELS")
                .map(|raw| parse_model_list(&raw))
                .filter(|models| !models.is_empty())
                .unwrap_or_else(default_models),
            oauth_redirect_url: optional_env("OAUTH_REDIRECT_URL"),
            ai_timeout: Duration::from_secs(parse_env_or("AI_TIMEOUT_SECS", 30)?),
            store_timeout: Duration::from_secs(parse_env_or("STORE_TIMEOUT_SECS", 15)?),
            port: parse_env_or("PORT", 8080)?,
            session_idle: Duration::from_secs(parse_env_or("SESSION_IDLE_SECS", 1800)?),
        })
    }

    /// Configuration with every external collaborator disabled.
    #[cfg(test)]
    pub fn offline() -> Self {
        Config {
            backend: None,
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_models: default_models(),
            oauth_redirect_url: None,
            ai_timeout: Duration::from_secs(30),
            store_timeout: Duration::from_secs(15),
            port: 8080,
            session_idle: Duration::from_secs(1800),
        }
    }
}

fn default_models() -> Vec<String> {
    DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect()
}

/// Reads an env var, trimming whitespace. Empty values count as missing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}
