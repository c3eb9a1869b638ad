//! Realtime channel — the per-session WebSocket.
//!
//! DESIGN
//! ======
//! A `RealtimeChannel` is one open socket bound to one session id. It is
//! owned by the chat loop and passed explicitly to `send`/`close`; nothing
//! global refers to it. Only `message` frames surface to the caller; every
//! other discriminator and any malformed text is dropped here.
//!
//! LIFECYCLE
//! =========
//! `open` → `Open`; remote close, transport error, or `close` → `Closed`.
//! There is no reconnect: once closed, `send` no-ops and `next_event`
//! reports `Closed`.

use frames::{ClientFrame, ServerFrame};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelState {
    Unopened,
    Open,
    Closed,
}

/// What the channel surfaces to the chat loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Content of one inbound `message` frame.
    Message(String),
    /// The socket is gone; no further events will arrive.
    Closed,
}

pub struct RealtimeChannel {
    stream: WsStream,
    state: ChannelState,
    url: String,
}

impl RealtimeChannel {
    /// Open the socket.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WsConnect`] when the handshake fails.
    pub async fn open(url: &str) -> Result<Self, ClientError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|error| ClientError::WsConnect(Box::new(error)))?;
        info!(%url, "channel: open");
        Ok(Self { stream, state: ChannelState::Open, url: url.to_owned() })
    }

    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.state
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Serialize and transmit one outbound frame. Returns `Ok(false)` without
    /// touching the socket when the channel is not open.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WsSend`] when the transport rejects the frame;
    /// the channel is closed afterwards.
    pub async fn send(&mut self, frame: &ClientFrame) -> Result<bool, ClientError> {
        if self.state != ChannelState::Open {
            debug!(url = %self.url, "channel: send on closed channel dropped");
            return Ok(false);
        }
        let text = frames::encode_client_frame(frame);
        if let Err(error) = self.stream.send(Message::Text(text.into())).await {
            self.state = ChannelState::Closed;
            return Err(ClientError::WsSend(Box::new(error)));
        }
        Ok(true)
    }

    /// Wait for the next surfaced event.
    pub async fn next_event(&mut self) -> ChannelEvent {
        if self.state != ChannelState::Open {
            return ChannelEvent::Closed;
        }
        loop {
            let Some(message) = self.stream.next().await else {
                break;
            };
            match message {
                Ok(Message::Text(text)) => {
                    if let Some(content) = surface(text.as_str()) {
                        return ChannelEvent::Message(content);
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(error) => {
                    warn!(url = %self.url, %error, "channel: transport error");
                    break;
                }
            }
        }
        self.state = ChannelState::Closed;
        info!(url = %self.url, "channel: closed by peer");
        ChannelEvent::Closed
    }

    /// Close the socket. Safe to call on an already closed channel.
    pub async fn close(mut self) {
        if self.state == ChannelState::Open {
            if let Err(error) = self.stream.close(None).await {
                debug!(url = %self.url, %error, "channel: close handshake failed");
            }
        }
        self.state = ChannelState::Closed;
        info!(url = %self.url, "channel: closed");
    }
}

/// Content to surface for one inbound text frame, if any.
fn surface(text: &str) -> Option<String> {
    let frame: ServerFrame = match frames::decode_server_frame(text) {
        Ok(frame) => frame,
        Err(error) => {
            debug!(%error, "channel: malformed frame dropped");
            return None;
        }
    };
    let content = frame.message_content();
    if content.is_none() {
        debug!(kind = frame.kind.as_str(), "channel: frame ignored");
    }
    content.map(ToOwned::to_owned)
}

#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;
