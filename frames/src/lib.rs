//! Shared JSON envelopes for the chat REST and WebSocket surface.
//!
//! This crate owns the wire representation used by both the `lu` client and
//! `lu-server`. Socket frames are flat JSON objects discriminated by a `type`
//! string on the server-to-client side, and a single `message` field on the
//! client-to-server side.

use serde::{Deserialize, Serialize};

/// Error returned by the decode helpers.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text could not be parsed as the expected JSON envelope.
    #[error("failed to decode frame: {0}")]
    Decode(#[from] serde_json::Error),
}

// =============================================================================
// SOCKET FRAMES
// =============================================================================

/// Discriminator of a server-to-client frame.
///
/// Unknown discriminators are preserved in [`FrameKind::Other`] so newer
/// servers can add event types without breaking older clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Assistant-authored text to append to the transcript.
    Message,
    /// Progress hint, e.g. `"thinking"`.
    Status,
    /// Server-side failure description.
    Error,
    /// End of one reply.
    End,
    /// Any other discriminator.
    Other(String),
}

impl FrameKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Message => "message",
            Self::Status => "status",
            Self::Error => "error",
            Self::End => "end",
            Self::Other(raw) => raw,
        }
    }

    fn parse(raw: &str) -> Self {
        match raw {
            "message" => Self::Message,
            "status" => Self::Status,
            "error" => Self::Error,
            "end" => Self::End,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl Serialize for FrameKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FrameKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// A frame sent from the server to the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFrame {
    #[serde(rename = "type")]
    pub kind: FrameKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ServerFrame {
    #[must_use]
    pub fn new(kind: FrameKind, content: impl Into<String>) -> Self {
        Self { kind, content: Some(content.into()), session_id: None }
    }

    #[must_use]
    pub fn message(content: impl Into<String>) -> Self {
        Self::new(FrameKind::Message, content)
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Content of a `message` frame. `None` for every other kind, and for a
    /// `message` frame that carries no `content`.
    #[must_use]
    pub fn message_content(&self) -> Option<&str> {
        if self.kind != FrameKind::Message {
            return None;
        }
        self.content.as_deref()
    }
}

/// A frame sent from the client to the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFrame {
    #[serde(default)]
    pub message: String,
}

impl ClientFrame {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Decode a server frame from socket text.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] when the text is not a JSON object with a
/// string `type` field.
pub fn decode_server_frame(text: &str) -> Result<ServerFrame, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Decode a client frame from socket text.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed JSON.
pub fn decode_client_frame(text: &str) -> Result<ClientFrame, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a server frame as socket text.
#[must_use]
pub fn encode_server_frame(frame: &ServerFrame) -> String {
    // Serializing plain string fields cannot fail.
    serde_json::to_string(frame).unwrap_or_default()
}

/// Encode a client frame as socket text.
#[must_use]
pub fn encode_client_frame(frame: &ClientFrame) -> String {
    serde_json::to_string(frame).unwrap_or_default()
}

// =============================================================================
// TRANSCRIPT
// =============================================================================

/// Author of one transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

// =============================================================================
// REST BODIES
// =============================================================================

/// Body of `POST /api/v1/sessions`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting_message: Option<String>,
}

/// Body of `GET /api/v1/sessions/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub message_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of `DELETE /api/v1/sessions/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

/// Body of `GET /health` and `GET /ready`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub environment: String,
}

/// Error body returned with any non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
