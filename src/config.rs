//! Client configuration: the two service base URLs.
//!
//! Values come from CLI flags or the `LU_API_URL` / `LU_WS_URL` environment
//! variables (see `main.rs`), each falling back to a local development
//! address. Both are validated and normalized here.

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_WS_URL: &str = "ws://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base: String,
    ws_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_base: DEFAULT_API_URL.to_owned(), ws_base: DEFAULT_WS_URL.to_owned() }
    }
}

impl ClientConfig {
    /// Validate and normalize both base URLs. Trailing slashes are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] when the API base is not
    /// `http(s)://` or the socket base is not `ws(s)://`.
    pub fn new(api_base: &str, ws_base: &str) -> Result<Self, ClientError> {
        let api_base = normalize(api_base, &["http://", "https://"], "an http:// or https:// URL")?;
        let ws_base = normalize(ws_base, &["ws://", "wss://"], "a ws:// or wss:// URL")?;
        Ok(Self { api_base, ws_base })
    }

    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    #[must_use]
    pub fn ws_base(&self) -> &str {
        &self.ws_base
    }

    #[must_use]
    pub fn sessions_url(&self) -> String {
        format!("{}/api/v1/sessions", self.api_base)
    }

    #[must_use]
    pub fn session_url(&self, session_id: &str) -> String {
        format!("{}/api/v1/sessions/{session_id}", self.api_base)
    }

    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}/health", self.api_base)
    }

    #[must_use]
    pub fn ws_url(&self, session_id: &str) -> String {
        format!("{}/api/v1/ws/{session_id}", self.ws_base)
    }
}

fn normalize(raw: &str, schemes: &[&str], expected: &'static str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = schemes
        .iter()
        .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if !has_host {
        return Err(ClientError::InvalidBaseUrl { url: raw.to_owned(), expected });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
