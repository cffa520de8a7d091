//! Symptom Checker Server
//!
//! HTTP front end for the disease prediction core.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SYMPTOM CHECKER SERVER                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────────────────────────────┐   │
//! │  │  API      │   │  PredictionService (Arc, read-only)  │   │
//! │  │  Routes   │──►│  catalog ─► vector ─► decision tree  │   │
//! │  │  (Axum)   │   │  ─► descriptions / precautions       │   │
//! │  └───────────┘   └──────────────────┬───────────────────┘   │
//! │                                     ▼                       │
//! │                      Data/*.csv   MasterData/*.csv          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every table is loaded and the model is fitted before the listener is
//! bound; a failure there stops the process.

mod config;
mod error;
mod handlers;
mod models;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use diagnosis_core::PredictionService;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let json = config.json_logs();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "diagnosis_server=debug,diagnosis_core=info,tower_http=debug".into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Symptom Checker Server starting ({})...", config.environment);
    tracing::info!("Data: {}, master data: {}", config.data_dir.display(), config.master_data_dir.display());

    // Load tables and fit the model off the async runtime
    let paths = config.data_paths();
    let training = config.training_config();
    let service = tokio::task::spawn_blocking(move || PredictionService::bootstrap(&paths, &training))
        .await
        .context("model initialization task panicked")?
        .context("Failed to initialize prediction service")?;

    // Build application state
    let state = AppState {
        service: Arc::new(service),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let cors = match HeaderValue::from_str(&state.config.cors_origin) {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!("Invalid CORS_ORIGIN {:?}, allowing any origin", state.config.cors_origin);
            CorsLayer::new().allow_origin(Any)
        }
    };

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/get_symptoms", get(handlers::symptoms::list))
        .route("/predict", post(handlers::prediction::predict))
        .route("/start_conversation", post(handlers::prediction::start_conversation))
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors.allow_methods(Any).allow_headers(Any))
        .with_state(state)
}
