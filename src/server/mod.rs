//! HTTP API.
//!
//! - `GET /health`: 503 until the provider credential is configured
//! - `GET /usage`: usage summary
//! - `POST /usage/reset`: clear usage stats
//! - `POST /decide`: ask a model for a poker decision

mod error;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::decision::{DecisionRequest, DecisionResponse, DecisionService};
use crate::inference::HuggingFaceProvider;
use crate::usage::{SharedUsageCounter, UsageSummary};

pub use error::ApiError;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Response for `POST /usage/reset`
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub usage: UsageSummary,
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    service: Arc<DecisionService>,
}

impl AppState {
    pub fn new(service: DecisionService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/usage", get(usage))
        .route("/usage/reset", post(reset_usage))
        .route("/decide", post(decide))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire the production service from configuration.
pub fn build_service(config: &AppConfig) -> Result<DecisionService> {
    let provider = HuggingFaceProvider::new(config.huggingface())
        .context("Failed to create inference client")?;
    let usage = SharedUsageCounter::open(config.usage_store());

    Ok(DecisionService::new(Arc::new(provider), usage)
        .with_registry(config.registry())
        .with_estimator(config.estimator())
        .with_spectate_daily_limit(config.usage.spectate_daily_limit)
        .with_timeout(config.inference.timeout()))
}

/// Run the HTTP server until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<()> {
    let service = build_service(&config)?;
    if !service.is_ready() {
        warn!("HF_API_KEY not configured; /health will report unavailable");
    }

    let app = router(AppState::new(service), &config.server.cors_origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", err);
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if !state.service.is_ready() {
        return Err(ApiError::NotConfigured("HF_API_KEY not configured".to_string()));
    }
    Ok(Json(HealthResponse { status: "ok" }))
}

async fn usage(State(state): State<AppState>) -> Json<UsageSummary> {
    Json(state.service.usage().summary())
}

async fn reset_usage(State(state): State<AppState>) -> Result<Json<ResetResponse>, ApiError> {
    let usage = state.service.usage().clone();
    let summary = tokio::task::spawn_blocking(move || {
        usage.reset();
        usage.summary()
    })
    .await
    .map_err(|e| ApiError::Internal(format!("usage reset failed: {}", e)))?;

    Ok(Json(ResetResponse {
        status: "reset",
        usage: summary,
    }))
}

async fn decide(
    State(state): State<AppState>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    info!(player = %request.player_name, mode = ?request.mode(), "Decision requested");
    let response = state.service.decide(&request).await?;
    Ok(Json(response))
}
