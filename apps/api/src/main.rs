mod auth;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod navigation;
mod profiles;
mod routes;
mod sessions;
mod state;
mod swipe;
mod voice;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

/// Filter used when `RUST_LOG` is unset or unparsable.
fn default_log_directive() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME").replace('-', "_"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // load .env if present; ignore if missing

    // Must precede Config::from_env, which reports missing collaborators via warn!
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_directive())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobz API v{}", env!("CARGO_PKG_VERSION"));

    // Missing collaborators only narrow capabilities
    let config = Config::from_env()?;

    let port = config.port;
    let session_idle = config.session_idle;
    let state = AppState::from_config(config)?;
    tokio::spawn(state.sessions.clone().run_sweeper(session_idle));
    info!(
        "Capabilities: backend={}, ai={}, auth={}",
        state.profiles.is_configured(),
        state.extractor.is_configured(),
        state.identity.is_some()
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
