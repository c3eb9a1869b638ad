use super::*;
use crate::test_support::{Script, spawn_script_server};
use futures_util::StreamExt;
use tokio::time::{Duration, timeout};

// =============================================================================
// surface
// =============================================================================

#[test]
fn message_frame_surfaces_content() {
    assert_eq!(surface(r#"{"type":"message","content":"hi there"}"#).as_deref(), Some("hi there"));
}

#[test]
fn other_kinds_are_dropped() {
    assert_eq!(surface(r#"{"type":"typing"}"#), None);
    assert_eq!(surface(r#"{"type":"status","content":"thinking"}"#), None);
    assert_eq!(surface(r#"{"type":"end","content":""}"#), None);
    assert_eq!(surface(r#"{"type":"error","content":"boom"}"#), None);
}

#[test]
fn message_without_content_is_dropped() {
    assert_eq!(surface(r#"{"type":"message"}"#), None);
}

#[test]
fn malformed_text_is_dropped() {
    assert_eq!(surface("not json"), None);
    assert_eq!(surface(r#"{"content":"no type"}"#), None);
}

// =============================================================================
// live socket
// =============================================================================

#[tokio::test]
async fn open_send_and_receive() {
    let script = Script {
        on_connect: vec![
            r#"{"type":"typing"}"#.into(),
            "garbage".into(),
            r#"{"type":"message","content":"welcome"}"#.into(),
        ],
        on_message: vec![r#"{"type":"message","content":"hi there"}"#.into()],
        ..Script::default()
    };
    let mut server = spawn_script_server(script).await;
    let url = server.config().ws_url("abc123");

    let mut channel = RealtimeChannel::open(&url).await.expect("open");
    assert_eq!(channel.state(), ChannelState::Open);
    assert_eq!(channel.url(), url);
    assert_eq!(server.ws_paths.recv().await.as_deref(), Some("abc123"));

    let first = timeout(Duration::from_secs(5), channel.next_event()).await.expect("event");
    assert_eq!(first, ChannelEvent::Message("welcome".into()));

    assert!(channel.send(&ClientFrame::new("hello")).await.expect("send"));
    let raw = timeout(Duration::from_secs(5), server.received.recv()).await.expect("received");
    assert_eq!(raw.as_deref(), Some(r#"{"message":"hello"}"#));

    let reply = timeout(Duration::from_secs(5), channel.next_event()).await.expect("event");
    assert_eq!(reply, ChannelEvent::Message("hi there".into()));

    channel.close().await;
}

#[tokio::test]
async fn open_against_closed_port_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let result = RealtimeChannel::open(&format!("ws://{addr}/api/v1/ws/x")).await;
    assert!(matches!(result, Err(ClientError::WsConnect(_))));
}

#[tokio::test]
async fn remote_close_marks_channel_closed_and_send_noops() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream).await.expect("handshake");
        ws.close(None).await.ok();
        while ws.next().await.is_some() {}
    });

    let mut channel = RealtimeChannel::open(&format!("ws://{addr}/api/v1/ws/x")).await.expect("open");
    let event = timeout(Duration::from_secs(5), channel.next_event()).await.expect("event");
    assert_eq!(event, ChannelEvent::Closed);
    assert_eq!(channel.state(), ChannelState::Closed);
    assert!(!channel.send(&ClientFrame::new("late")).await.expect("no-op send"));
    assert_eq!(channel.next_event().await, ChannelEvent::Closed);
}
