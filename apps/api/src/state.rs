use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::auth::{IdentityProvider, SupabaseAuth};
use crate::config::Config;
use crate::extraction::ExtractionGateway;
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::profiles::store::{ProfileStore, SupabaseStore};
use crate::profiles::ProfileGateway;
use crate::sessions::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionRegistry>,
    pub profiles: ProfileGateway,
    pub extractor: ExtractionGateway,
    /// `None` when the backend is not configured; sign-in is then demo-only.
    pub identity: Option<Arc<dyn IdentityProvider>>,
}

impl AppState {
    pub fn new(
        config: Config,
        profiles: ProfileGateway,
        extractor: ExtractionGateway,
        identity: Option<Arc<dyn IdentityProvider>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionRegistry::new()),
            profiles,
            extractor,
            identity,
        }
    }

    /// Wires the HTTP adapters for every collaborator the config enables.
    pub fn from_config(config: Config) -> Result<Self> {
        let generator: Option<Arc<dyn TextGenerator>> = match &config.gemini_api_key {
            Some(key) => {
                let client = GeminiClient::new(&config.gemini_base_url, key.clone(), config.ai_timeout)?;
                info!("Gemini client initialized (models: {})", config.gemini_models.join(", "));
                Some(Arc::new(client))
            }
            None => None,
        };

        let (store, identity) = match &config.backend {
            Some(backend) => {
                let store: Arc<dyn ProfileStore> = Arc::new(SupabaseStore::new(
                    &backend.url,
                    backend.anon_key.clone(),
                    config.store_timeout,
                )?);
                let identity: Arc<dyn IdentityProvider> = Arc::new(SupabaseAuth::new(
                    &backend.url,
                    backend.anon_key.clone(),
                    config.store_timeout,
                )?);
                info!("Backend clients initialized for {}", backend.url);
                (Some(store), Some(identity))
            }
            None => (None, None),
        };

        let extractor = ExtractionGateway::new(generator, config.gemini_models.clone());
        Ok(Self::new(config, ProfileGateway::new(store), extractor, identity))
    }
}
