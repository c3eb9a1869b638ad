//! WebSocket handler — per-session chat relay.
//!
//! DESIGN
//! ======
//! One socket per session id. Each inbound text frame is a `{ message }`
//! envelope; the handler records it, asks the responder for a reply, and
//! answers with `status`, `message`, then `end`. The whole reply travels in a
//! single `message` frame so clients that only consume `message` frames see
//! complete text.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → if the session is unknown, create it and send a greeting
//! 2. Client sends `{ message }` → blank messages are skipped
//! 3. Reply frames are written back in order
//! 4. Close → log and drop; session state survives until deleted or expired

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use frames::{FrameKind, Role, ServerFrame};
use tracing::{error, info, warn};

use crate::responder::GREETING;
use crate::services;
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state, session_id))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, session_id: String) {
    info!(%session_id, "ws: client connected");

    if let Some(greeting) = attach_session(&state, &session_id).await {
        if send_frame(&mut socket, &greeting).await.is_err() {
            return;
        }
    }

    'recv: while let Some(msg) = socket.recv().await {
        let Ok(msg) = msg else { break };
        match msg {
            Message::Text(text) => {
                for frame in process_inbound_text(&state, &session_id, text.as_str()).await {
                    if send_frame(&mut socket, &frame).await.is_err() {
                        break 'recv;
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!(%session_id, "ws: client disconnected");
}

/// Make sure the session exists. Returns the greeting frame when the session
/// had to be created for this socket.
async fn attach_session(state: &AppState, session_id: &str) -> Option<ServerFrame> {
    if services::session::touch(state, session_id).await {
        return None;
    }
    services::session::create_session(state, session_id).await;
    Some(ServerFrame::message(GREETING).with_session_id(session_id))
}

async fn send_frame(socket: &mut WebSocket, frame: &ServerFrame) -> Result<(), axum::Error> {
    let text = frames::encode_server_frame(frame);
    socket.send(Message::Text(text.into())).await
}

// =============================================================================
// FRAME PROCESSING
// =============================================================================

/// Parse and process one inbound text frame and return the frames to send
/// back, in order.
async fn process_inbound_text(state: &AppState, session_id: &str, text: &str) -> Vec<ServerFrame> {
    let req = match frames::decode_client_frame(text) {
        Ok(req) => req,
        Err(e) => {
            warn!(%session_id, error = %e, "ws: invalid inbound frame");
            return vec![ServerFrame::new(FrameKind::Error, format!("invalid json: {e}")).with_session_id(session_id)];
        }
    };

    if req.message.trim().is_empty() {
        return Vec::new();
    }

    let history = services::session::history(state, session_id).await;
    services::session::add_message(state, session_id, Role::User, &req.message).await;

    let mut out = vec![ServerFrame::new(FrameKind::Status, "thinking").with_session_id(session_id)];
    match state.responder.reply(&history, &req.message).await {
        Ok(reply) => {
            services::session::add_message(state, session_id, Role::Assistant, &reply).await;
            state.metrics.record_message();
            out.push(ServerFrame::message(reply).with_session_id(session_id));
            out.push(ServerFrame::new(FrameKind::End, "").with_session_id(session_id));
        }
        Err(e) => {
            error!(%session_id, error = %e, "ws: responder failed");
            out.push(ServerFrame::new(FrameKind::Error, e.to_string()).with_session_id(session_id));
        }
    }
    out
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
