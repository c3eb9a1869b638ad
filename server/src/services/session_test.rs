use super::*;
use crate::config::ServerConfig;
use crate::responder::KnowledgeBaseResponder;
use crate::state::test_helpers::test_app_state;
use std::sync::Arc;

fn state_with_history_cap(cap: usize) -> AppState {
    let config = ServerConfig { max_message_history: cap, ..ServerConfig::default() };
    AppState::new(config, Arc::new(KnowledgeBaseResponder::new()))
}

// =============================================================================
// create / summary / delete
// =============================================================================

#[test]
fn generate_session_id_is_a_uuid() {
    let id = generate_session_id();
    assert!(Uuid::parse_str(&id).is_ok());
    assert_ne!(id, generate_session_id());
}

#[tokio::test]
async fn create_then_summary_reports_empty_history() {
    let state = test_app_state();
    let created_at = create_session(&state, "s1").await;
    assert!(created_at.is_some());

    let summary = summary(&state, "s1").await.expect("summary");
    assert_eq!(summary.session_id, "s1");
    assert_eq!(summary.message_count, 0);
    assert_eq!(summary.created_at, created_at);
    assert_eq!(state.metrics.total_sessions(), 1);
}

#[tokio::test]
async fn summary_of_unknown_session_is_none() {
    let state = test_app_state();
    assert!(summary(&state, "missing").await.is_none());
    assert!(!touch(&state, "missing").await);
}

#[tokio::test]
async fn delete_reports_whether_session_existed() {
    let state = test_app_state();
    create_session(&state, "s1").await;
    assert!(delete_session(&state, "s1").await);
    assert!(!delete_session(&state, "s1").await);
    assert_eq!(active_count(&state).await, 0);
}

// =============================================================================
// history
// =============================================================================

#[tokio::test]
async fn add_message_to_unknown_session_is_rejected() {
    let state = test_app_state();
    assert!(!add_message(&state, "missing", Role::User, "hi").await);
    assert!(history(&state, "missing").await.is_empty());
}

#[tokio::test]
async fn history_keeps_newest_entries_under_cap() {
    let state = state_with_history_cap(3);
    create_session(&state, "s1").await;
    for i in 0..5 {
        add_message(&state, "s1", Role::User, &format!("m{i}")).await;
    }

    let contents: Vec<String> = history(&state, "s1").await.into_iter().map(|m| m.content).collect();
    assert_eq!(contents, vec!["m2", "m3", "m4"]);
}

// =============================================================================
// expiry
// =============================================================================

#[tokio::test]
async fn purge_expired_removes_only_idle_sessions() {
    let config = ServerConfig { session_ttl: Duration::from_secs(10), ..ServerConfig::default() };
    let state = AppState::new(config, Arc::new(KnowledgeBaseResponder::new()));
    create_session(&state, "old").await;
    create_session(&state, "fresh").await;

    let now = Instant::now();
    {
        let mut sessions = state.sessions.write().await;
        let old = sessions.get_mut("old").expect("old session");
        old.last_seen = now.checked_sub(Duration::from_secs(60)).expect("instant in range");
    }

    assert_eq!(purge_expired(&state, now).await, 1);
    assert!(touch(&state, "fresh").await);
    assert!(!touch(&state, "old").await);
}
