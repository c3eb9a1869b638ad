//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the live session map, the reply source, and process counters.
//! Sessions live only in memory and are purged by the expiry task once idle
//! longer than the configured TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use frames::Role;
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::responder::Responder;

// =============================================================================
// SESSION RECORD
// =============================================================================

/// One transcript entry kept for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub role: Role,
    pub content: String,
}

/// Per-session live state.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// RFC 3339 creation timestamp, if it could be formatted.
    pub created_at: Option<String>,
    /// Refreshed on every read or write; drives expiry.
    pub last_seen: Instant,
    /// Most recent messages, oldest first, capped at `max_message_history`.
    pub messages: Vec<StoredMessage>,
}

impl SessionRecord {
    #[must_use]
    pub fn new(created_at: Option<String>) -> Self {
        Self { created_at, last_seen: Instant::now(), messages: Vec::new() }
    }
}

// =============================================================================
// METRICS
// =============================================================================

#[derive(Debug, Default)]
pub struct Metrics {
    total_sessions: AtomicU64,
    total_messages: AtomicU64,
}

impl Metrics {
    pub fn record_session(&self) {
        self.total_sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_message(&self) {
        self.total_messages.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn total_sessions(&self) -> u64 {
        self.total_sessions.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total_messages(&self) -> u64 {
        self.total_messages.load(Ordering::Relaxed)
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
    pub responder: Arc<dyn Responder>,
    pub metrics: Arc<Metrics>,
    pub started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, responder: Arc<dyn Responder>) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            responder,
            metrics: Arc::new(Metrics::default()),
            started_at: Instant::now(),
        }
    }
}


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
