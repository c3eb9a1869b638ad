//! Session initializer and the rest of the session REST surface.
//!
//! DESIGN
//! ======
//! `create_session` is the one request the chat view issues on mount. It is
//! sent once, with no retry and no client-side timeout; a failure is returned
//! to the caller, which leaves the session unset. The other calls back the
//! `lu session` and `lu ping` subcommands.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ClientError::ServerError`, carrying the server's
//! `{ error, detail }` body when it parses, or the raw body text otherwise.

use std::fmt;

use frames::{Acknowledgement, ErrorBody, HealthStatus, SessionCreated, SessionSummary};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::ClientError;

// =============================================================================
// SESSION
// =============================================================================

/// Opaque, non-empty session identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw id. Returns `None` for an empty string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A session as published to the chat view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub created_at: Option<String>,
    /// Server greeting. Informational only; never appended to the transcript.
    pub greeting: Option<String>,
}

impl TryFrom<SessionCreated> for Session {
    type Error = ClientError;

    fn try_from(body: SessionCreated) -> Result<Self, Self::Error> {
        let id = SessionId::new(body.session_id).ok_or(ClientError::EmptySessionId)?;
        Ok(Self { id, created_at: body.created_at, greeting: body.greeting_message })
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone, Debug)]
pub struct SessionClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl SessionClient {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST /api/v1/sessions`.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses, undecodable bodies, and an empty
    /// `session_id` are all returned as [`ClientError`].
    pub async fn create_session(&self) -> Result<Session, ClientError> {
        let url = self.config.sessions_url();
        debug!(%url, "session: creating");
        let response = self.http.post(&url).send().await?;
        let body: SessionCreated = read_json(response).await?;
        let session = Session::try_from(body)?;
        info!(session_id = %session.id, "session: created");
        Ok(session)
    }

    /// `GET /api/v1/sessions/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ServerError`] with status 404 for unknown ids.
    pub async fn fetch_session(&self, id: &SessionId) -> Result<SessionSummary, ClientError> {
        let response = self.http.get(self.config.session_url(id.as_str())).send().await?;
        read_json(response).await
    }

    /// `DELETE /api/v1/sessions/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ServerError`] with status 404 for unknown ids.
    pub async fn delete_session(&self, id: &SessionId) -> Result<Acknowledgement, ClientError> {
        let response = self.http.delete(self.config.session_url(id.as_str())).send().await?;
        read_json(response).await
    }

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// Returns an error when the server is unreachable or unhealthy.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.http.get(self.config.health_url()).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ClientError::ServerError { status: status.as_u16(), message: error_message(&text) });
    }
    Ok(response.json::<T>().await?)
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error, detail: Some(detail) }) => format!("{error} ({detail})"),
        Ok(ErrorBody { error, detail: None }) => error,
        Err(_) => body.to_owned(),
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
