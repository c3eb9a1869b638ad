//! Loopback servers for the client's network tests.
//!
//! `spawn_dev_server` runs the real `lu-server` router. `spawn_script_server`
//! runs a tiny scripted backend whose session id, socket frames, and failure
//! modes are chosen by the test.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message as AxumMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lu_server::config::ServerConfig;
use lu_server::responder::KnowledgeBaseResponder;
use lu_server::state::AppState;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::ClientConfig;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    addr
}

/// Client config pointing both bases at `addr`.
pub fn config_for(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(&format!("http://{addr}"), &format!("ws://{addr}")).expect("loopback config")
}

/// Start the development backend with its default responder.
pub async fn spawn_dev_server() -> SocketAddr {
    let state = AppState::new(ServerConfig::default(), Arc::new(KnowledgeBaseResponder::new()));
    serve(lu_server::routes::app(state)).await
}

// =============================================================================
// SCRIPTED BACKEND
// =============================================================================

/// Behaviour of the scripted backend.
#[derive(Clone)]
pub struct Script {
    /// Value returned as `session_id`.
    pub session_id: String,
    /// Status for `POST /api/v1/sessions`. Anything but 200 returns an error body.
    pub session_status: StatusCode,
    /// Delay before the session response is written.
    pub session_delay: Duration,
    /// Raw text frames pushed as soon as a socket attaches.
    pub on_connect: Vec<String>,
    /// Raw text frames pushed after every inbound client frame.
    pub on_message: Vec<String>,
    /// Close the socket right after the `on_connect` frames.
    pub close_after_connect: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            session_id: "abc123".into(),
            session_status: StatusCode::OK,
            session_delay: Duration::ZERO,
            on_connect: Vec::new(),
            on_message: Vec::new(),
            close_after_connect: false,
        }
    }
}

#[derive(Clone)]
struct ScriptState {
    script: Arc<Script>,
    session_requests: Arc<AtomicUsize>,
    ws_connects: Arc<AtomicUsize>,
    ws_paths: mpsc::UnboundedSender<String>,
    received: mpsc::UnboundedSender<String>,
}

pub struct ScriptServer {
    pub addr: SocketAddr,
    pub session_requests: Arc<AtomicUsize>,
    pub ws_connects: Arc<AtomicUsize>,
    /// Session id from each socket upgrade path, in arrival order.
    pub ws_paths: mpsc::UnboundedReceiver<String>,
    /// Raw text of every inbound client frame, in arrival order.
    pub received: mpsc::UnboundedReceiver<String>,
}

impl ScriptServer {
    pub fn config(&self) -> ClientConfig {
        config_for(self.addr)
    }

    pub fn session_requests(&self) -> usize {
        self.session_requests.load(Ordering::SeqCst)
    }

    pub fn ws_connects(&self) -> usize {
        self.ws_connects.load(Ordering::SeqCst)
    }
}

pub async fn spawn_script_server(script: Script) -> ScriptServer {
    let (ws_paths_tx, ws_paths) = mpsc::unbounded_channel();
    let (received_tx, received) = mpsc::unbounded_channel();
    let state = ScriptState {
        script: Arc::new(script),
        session_requests: Arc::new(AtomicUsize::new(0)),
        ws_connects: Arc::new(AtomicUsize::new(0)),
        ws_paths: ws_paths_tx,
        received: received_tx,
    };
    let session_requests = state.session_requests.clone();
    let ws_connects = state.ws_connects.clone();

    let router = Router::new()
        .route("/api/v1/sessions", post(scripted_session))
        .route("/api/v1/ws/{session_id}", get(scripted_ws))
        .with_state(state);
    let addr = serve(router).await;

    ScriptServer { addr, session_requests, ws_connects, ws_paths, received }
}

async fn scripted_session(State(state): State<ScriptState>) -> Response {
    state.session_requests.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(state.script.session_delay).await;
    if state.script.session_status != StatusCode::OK {
        let body = json!({ "error": "Failed to create session", "detail": "scripted failure" });
        return (state.script.session_status, Json(body)).into_response();
    }
    Json(json!({ "session_id": state.script.session_id })).into_response()
}

async fn scripted_ws(
    ws: WebSocketUpgrade,
    Path(session_id): Path<String>,
    State(state): State<ScriptState>,
) -> Response {
    state.ws_connects.fetch_add(1, Ordering::SeqCst);
    let _ = state.ws_paths.send(session_id);
    ws.on_upgrade(move |socket| run_script(socket, state))
}

async fn run_script(mut socket: WebSocket, state: ScriptState) {
    for frame in &state.script.on_connect {
        if socket.send(AxumMessage::Text(frame.clone().into())).await.is_err() {
            return;
        }
    }
    if state.script.close_after_connect {
        let _ = socket.send(AxumMessage::Close(None)).await;
        return;
    }
    while let Some(Ok(message)) = socket.recv().await {
        let AxumMessage::Text(text) = message else {
            continue;
        };
        let _ = state.received.send(text.as_str().to_owned());
        for frame in &state.script.on_message {
            if socket.send(AxumMessage::Text(frame.clone().into())).await.is_err() {
                return;
            }
        }
    }
}
