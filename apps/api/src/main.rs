mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod narrative;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::Extractor;
use crate::llm_client::LlmClient;
use crate::matching::TfIdfSimilarity;
use crate::narrative::LlmNarrator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireFlow API v{}", env!("CARGO_PKG_VERSION"));

    // Compile extraction rule tables once
    let extractor = Extractor::new().context("Failed to compile extraction rules")?;
    info!("Extraction rules compiled");

    // Initialize LLM client
    let llm = LlmClient::new(&config);
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm.model(),
        config.llm_base_url
    );

    let state = AppState {
        config: config.clone(),
        extractor: Arc::new(extractor),
        similarity: Arc::new(TfIdfSimilarity),
        narrator: Arc::new(LlmNarrator::new(llm)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS restricted to the configured origins, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
