//! Session service — in-memory session lifecycle.
//!
//! DESIGN
//! ======
//! Sessions are keyed by an opaque string id (UUID v4 when the server mints
//! it, arbitrary when a socket attaches to an unknown id). Every access
//! refreshes `last_seen`; a background task purges sessions idle longer than
//! the configured TTL. Message history is trimmed to the newest
//! `max_message_history` entries on every append.

use std::time::{Duration, Instant};

use frames::{Role, SessionSummary};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::state::{AppState, SessionRecord, StoredMessage};

const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Mint a fresh session id.
#[must_use]
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

fn now_rfc3339() -> Option<String> {
    OffsetDateTime::now_utc().format(&Rfc3339).ok()
}

/// Create (or reset) a session and return its creation timestamp.
pub async fn create_session(state: &AppState, session_id: &str) -> Option<String> {
    let record = SessionRecord::new(now_rfc3339());
    let created_at = record.created_at.clone();
    state.sessions.write().await.insert(session_id.to_owned(), record);
    state.metrics.record_session();
    info!(%session_id, "session created");
    created_at
}

/// Whether a session exists. Refreshes `last_seen` when it does.
pub async fn touch(state: &AppState, session_id: &str) -> bool {
    let mut sessions = state.sessions.write().await;
    let Some(record) = sessions.get_mut(session_id) else {
        return false;
    };
    record.last_seen = Instant::now();
    true
}

/// Summary of a session for the REST surface.
pub async fn summary(state: &AppState, session_id: &str) -> Option<SessionSummary> {
    let mut sessions = state.sessions.write().await;
    let record = sessions.get_mut(session_id)?;
    record.last_seen = Instant::now();
    Some(SessionSummary {
        session_id: session_id.to_owned(),
        message_count: record.messages.len(),
        created_at: record.created_at.clone(),
    })
}

/// Remove a session. Returns `false` when it did not exist.
pub async fn delete_session(state: &AppState, session_id: &str) -> bool {
    let removed = state.sessions.write().await.remove(session_id).is_some();
    if removed {
        info!(%session_id, "session deleted");
    }
    removed
}

/// Append a message, trimming history to the configured cap.
/// Returns `false` when the session does not exist.
pub async fn add_message(state: &AppState, session_id: &str, role: Role, content: &str) -> bool {
    let cap = state.config.max_message_history;
    let mut sessions = state.sessions.write().await;
    let Some(record) = sessions.get_mut(session_id) else {
        return false;
    };
    record.messages.push(StoredMessage { role, content: content.to_owned() });
    if record.messages.len() > cap {
        let excess = record.messages.len() - cap;
        record.messages.drain(..excess);
    }
    record.last_seen = Instant::now();
    true
}

/// Snapshot of a session's history, oldest first. Empty for unknown ids.
pub async fn history(state: &AppState, session_id: &str) -> Vec<StoredMessage> {
    state
        .sessions
        .read()
        .await
        .get(session_id)
        .map(|record| record.messages.clone())
        .unwrap_or_default()
}

pub async fn active_count(state: &AppState) -> usize {
    state.sessions.read().await.len()
}

/// Drop every session idle for longer than the TTL as of `now`.
/// Returns the number of sessions removed.
pub async fn purge_expired(state: &AppState, now: Instant) -> usize {
    let ttl = state.config.session_ttl;
    let mut sessions = state.sessions.write().await;
    let before = sessions.len();
    sessions.retain(|_, record| now.saturating_duration_since(record.last_seen) <= ttl);
    let removed = before - sessions.len();
    if removed > 0 {
        info!(removed, "expired sessions purged");
    }
    removed
}

/// Spawn the background expiry sweep. Returns a handle for shutdown.
pub fn spawn_expiry_task(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EXPIRY_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            purge_expired(&state, Instant::now()).await;
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
