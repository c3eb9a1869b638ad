//! Client error type.

use crate::view::TransitionError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base URL `{url}`: expected {expected}")]
    InvalidBaseUrl { url: String, expected: &'static str },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("server returned an empty session id")]
    EmptySessionId,
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket send failed: {0}")]
    WsSend(Box<tokio_tungstenite::tungstenite::Error>),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
