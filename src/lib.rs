pub mod backend;
pub mod chat;
pub mod config;
pub mod delivery;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod prompts;
pub mod sanitize;
pub mod service;
pub mod state;
pub mod validate;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use backend::{ollama::OllamaClient, BackendError};
use config::GatewayConfig;
use tracing::info;

pub fn build_state(config: &GatewayConfig) -> Result<state::AppState, BackendError> {
    let backend = OllamaClient::new(
        config.backend.clone(),
        config.health_timeout,
        config.generate_timeout,
    )?;
    info!(
        base_url = %backend.config().base_url,
        model = %backend.config().model,
        health_timeout_secs = config.health_timeout.as_secs(),
        generate_timeout_secs = config.generate_timeout.as_secs(),
        "generation backend configured"
    );
    Ok(state::AppState::new(Arc::new(backend)))
}

fn api_routes() -> Router<state::AppState> {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/diagnose", post(handlers::diagnose))
        .route("/code", post(handlers::code))
        .route("/part-search", post(handlers::part_search))
        .route("/car-info", post(handlers::car_info))
}

/// The API is served both at the root and under `/api`, where the browser
/// mini-app expects it.
pub fn build_app(state: state::AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics))
        .merge(api_routes())
        .nest("/api", api_routes())
        .with_state(state)
}
