//! Session REST endpoints.

use axum::Json;
use axum::extract::{Path, State};
use frames::{Acknowledgement, SessionCreated, SessionSummary};

use crate::error::ApiError;
use crate::responder::GREETING;
use crate::services;
use crate::state::AppState;

/// `POST /api/v1/sessions`. Any request body is ignored.
pub async fn create_session(State(state): State<AppState>) -> Json<SessionCreated> {
    let session_id = services::session::generate_session_id();
    let created_at = services::session::create_session(&state, &session_id).await;
    Json(SessionCreated { session_id, created_at, greeting_message: Some(GREETING.to_owned()) })
}

/// `GET /api/v1/sessions/{id}`.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, ApiError> {
    services::session::summary(&state, &id)
        .await
        .map(Json)
        .ok_or(ApiError::SessionNotFound(id))
}

/// `DELETE /api/v1/sessions/{id}`.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Acknowledgement>, ApiError> {
    if !services::session::delete_session(&state, &id).await {
        return Err(ApiError::SessionNotFound(id));
    }
    Ok(Json(Acknowledgement { message: "Session deleted successfully".to_owned() }))
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
