//! HTTP error type for the REST handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use frames::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Session not found")]
    SessionNotFound(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match &self {
            Self::SessionNotFound(id) => Some(format!("no session with id {id}")),
        };
        let body = ErrorBody { error: self.to_string(), detail };
        (self.status(), Json(body)).into_response()
    }
}
