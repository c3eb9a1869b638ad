use super::*;
use crate::test_support::{Script, config_for, spawn_dev_server, spawn_script_server};
use axum::http::StatusCode;

// =============================================================================
// SessionId / Session
// =============================================================================

#[test]
fn session_id_rejects_empty() {
    assert!(SessionId::new("").is_none());
    assert_eq!(SessionId::new("abc123").map(|id| id.to_string()).as_deref(), Some("abc123"));
}

#[test]
fn session_from_body_requires_id() {
    let body = SessionCreated { session_id: String::new(), created_at: None, greeting_message: None };
    assert!(matches!(Session::try_from(body), Err(ClientError::EmptySessionId)));
}

#[test]
fn session_from_body_keeps_greeting() {
    let body = SessionCreated {
        session_id: "abc123".into(),
        created_at: Some("2024-01-01T00:00:00Z".into()),
        greeting_message: Some("hello".into()),
    };
    let session = Session::try_from(body).expect("valid body");
    assert_eq!(session.id.as_str(), "abc123");
    assert_eq!(session.greeting.as_deref(), Some("hello"));
}

#[test]
fn error_message_prefers_structured_body() {
    assert_eq!(error_message(r#"{"error":"Session not found","detail":"gone"}"#), "Session not found (gone)");
    assert_eq!(error_message(r#"{"error":"Session not found"}"#), "Session not found");
    assert_eq!(error_message("bad gateway"), "bad gateway");
}

// =============================================================================
// against the development backend
// =============================================================================

#[tokio::test]
async fn create_fetch_delete_roundtrip() {
    let addr = spawn_dev_server().await;
    let client = SessionClient::new(config_for(addr));

    let session = client.create_session().await.expect("create");
    assert!(!session.id.as_str().is_empty());
    assert!(session.greeting.is_some());

    let summary = client.fetch_session(&session.id).await.expect("fetch");
    assert_eq!(summary.session_id, session.id.as_str());
    assert_eq!(summary.message_count, 0);

    let ack = client.delete_session(&session.id).await.expect("delete");
    assert_eq!(ack.message, "Session deleted successfully");

    let err = client.fetch_session(&session.id).await.expect_err("deleted session");
    assert!(matches!(err, ClientError::ServerError { status: 404, .. }), "got {err:?}");
}

#[tokio::test]
async fn delete_unknown_session_is_not_found() {
    let addr = spawn_dev_server().await;
    let client = SessionClient::new(config_for(addr));
    let id = SessionId::new("missing").expect("non-empty");
    let err = client.delete_session(&id).await.expect_err("unknown session");
    assert!(matches!(err, ClientError::ServerError { status: 404, .. }), "got {err:?}");
}

#[tokio::test]
async fn health_reports_healthy() {
    let addr = spawn_dev_server().await;
    let client = SessionClient::new(config_for(addr));
    let health = client.health().await.expect("health");
    assert_eq!(health.status, "healthy");
}

// =============================================================================
// against a scripted backend
// =============================================================================

#[tokio::test]
async fn create_session_surfaces_server_failure() {
    let server = spawn_script_server(Script { session_status: StatusCode::INTERNAL_SERVER_ERROR, ..Script::default() }).await;
    let client = SessionClient::new(server.config());

    let err = client.create_session().await.expect_err("scripted failure");
    match err {
        ClientError::ServerError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to create session (scripted failure)");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.session_requests(), 1, "no retry");
}

#[tokio::test]
async fn create_session_rejects_empty_id() {
    let server = spawn_script_server(Script { session_id: String::new(), ..Script::default() }).await;
    let client = SessionClient::new(server.config());
    let err = client.create_session().await.expect_err("empty id");
    assert!(matches!(err, ClientError::EmptySessionId));
}

#[tokio::test]
async fn create_session_against_closed_port_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = SessionClient::new(config_for(addr));
    let err = client.create_session().await.expect_err("nothing listening");
    assert!(matches!(err, ClientError::Http(_)), "got {err:?}");
}
