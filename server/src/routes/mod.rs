//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the session REST endpoints, the per-session websocket, and the
//! health/metrics probes under a single Axum router with permissive CORS,
//! since the chat client may be served from any origin in development.

pub mod sessions;
pub mod ws;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use frames::HealthStatus;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{APP_NAME, APP_VERSION};
use crate::services;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        .route("/api/v1/sessions", post(sessions::create_session))
        .route(
            "/api/v1/sessions/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/api/v1/ws/{session_id}", get(ws::handle_ws))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": APP_NAME,
        "version": APP_VERSION,
        "environment": state.config.environment,
        "health": "/health",
    }))
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(health_status(&state, "healthy"))
}

/// All state is constructed before the router is built, so readiness is
/// equivalent to liveness here.
async fn ready(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(health_status(&state, "ready"))
}

fn health_status(state: &AppState, status: &str) -> HealthStatus {
    HealthStatus {
        status: status.to_owned(),
        version: APP_VERSION.to_owned(),
        environment: state.config.environment.clone(),
    }
}

async fn metrics(State(state): State<AppState>) -> Json<Value> {
    let active = services::session::active_count(&state).await;
    Json(json!({
        "total_sessions": state.metrics.total_sessions(),
        "active_sessions": active,
        "total_messages": state.metrics.total_messages(),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
    }))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
