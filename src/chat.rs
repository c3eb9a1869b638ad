//! Chat event loop.
//!
//! DESIGN
//! ======
//! `run_chat` is one mounted chat view from mount to unmount. It owns the
//! view and the optional channel handle, and multiplexes four sources in a
//! single `select!`: the in-flight session request, the channel handshake,
//! inbound channel events, and user input. Each branch only produces a `LoopEvent`; the event is
//! applied after the select so no borrow outlives a branch.
//!
//! The channel is opened only after a session is published, and is closed on
//! every exit path. Quitting before the session resolves drops the request,
//! and quitting mid-handshake drops the handshake; neither opens a channel.

use std::borrow::Cow;
use std::io::BufRead;

use frames::ClientFrame;
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::channel::{ChannelEvent, RealtimeChannel};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::render::Render;
use crate::session::{Session, SessionClient};
use crate::view::ChatView;

/// One event from the input source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A full line to submit as the draft.
    Line(String),
    /// Close the view and start over with a new session.
    Reload,
    Quit,
}

/// Classify one raw input line.
#[must_use]
pub fn parse_input_line(line: &str) -> InputEvent {
    match line.trim() {
        "/quit" | "/exit" => InputEvent::Quit,
        "/reload" => InputEvent::Reload,
        _ => InputEvent::Line(line.to_owned()),
    }
}

/// Feed lines from `reader` into `tx` until EOF, then send `Quit`. Blocking;
/// run it on a dedicated thread. Bytes that are not UTF-8 are replaced rather
/// than ending input.
pub fn pump_input(mut reader: impl BufRead, tx: &mpsc::Sender<InputEvent>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "input: read failed");
                break;
            }
        }
        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);
        if matches!(line, Cow::Owned(_)) {
            warn!("input: line was not valid UTF-8; invalid bytes replaced");
        }
        if tx.blocking_send(parse_input_line(&line)).is_err() {
            return;
        }
    }
    let _ = tx.blocking_send(InputEvent::Quit);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatExit {
    Quit,
    Reload,
}

/// Final state of one mounted view.
#[derive(Debug)]
pub struct ChatOutcome {
    pub exit: ChatExit,
    pub view: ChatView,
    /// Whether a channel was ever opened during this mount.
    pub channel_opened: bool,
}

enum LoopEvent {
    Session(Result<Session, ClientError>),
    Opened(Result<RealtimeChannel, ClientError>),
    Channel(ChannelEvent),
    Input(Option<InputEvent>),
}

type Opening = LocalBoxFuture<'static, Result<RealtimeChannel, ClientError>>;

/// Run one chat view until the user quits, reloads, or input ends.
///
/// # Errors
///
/// Returns [`ClientError::Transition`] if the view rejects a lifecycle step.
/// Session, connect, and send failures are reported through `renderer` and
/// logs, not returned.
pub async fn run_chat<R: Render>(
    client: &SessionClient,
    input: &mut mpsc::Receiver<InputEvent>,
    renderer: &mut R,
) -> Result<ChatOutcome, ClientError> {
    let mut view = ChatView::new();
    view.mount()?;
    renderer.mounted();
    renderer.phase_changed(view.phase());

    let pending = client.create_session();
    tokio::pin!(pending);
    let mut awaiting_session = true;
    let mut opening: Option<Opening> = None;
    let mut channel: Option<RealtimeChannel> = None;
    let mut channel_opened = false;

    let result: Result<ChatExit, ClientError> = loop {
        let event = tokio::select! {
            result = &mut pending, if awaiting_session => LoopEvent::Session(result),
            result = next_opened(&mut opening) => LoopEvent::Opened(result),
            event = next_channel_event(channel.as_mut()) => LoopEvent::Channel(event),
            line = input.recv() => LoopEvent::Input(line),
        };

        match event {
            LoopEvent::Session(Ok(session)) => {
                awaiting_session = false;
                match view.publish_session(session) {
                    Ok(id) => opening = Some(open_channel(client.config(), id.as_str())),
                    Err(error) => break Err(error.into()),
                }
            }
            LoopEvent::Session(Err(error)) => {
                awaiting_session = false;
                warn!(%error, "chat: session creation failed");
                renderer.notice(&format!("could not start a session: {error}"));
            }
            LoopEvent::Opened(Ok(opened)) => {
                opening = None;
                if let Err(error) = view.channel_opened() {
                    opened.close().await;
                    break Err(error.into());
                }
                renderer.phase_changed(view.phase());
                channel = Some(opened);
                channel_opened = true;
            }
            LoopEvent::Opened(Err(error)) => {
                opening = None;
                warn!(%error, "chat: channel open failed");
                renderer.notice(&format!("could not connect: {error}"));
            }
            LoopEvent::Channel(ChannelEvent::Message(content)) => {
                view.receive(content);
                renderer.store_changed(view.store());
            }
            LoopEvent::Channel(ChannelEvent::Closed) => {
                channel = None;
                renderer.notice("connection closed by server");
            }
            LoopEvent::Input(Some(InputEvent::Line(line))) => {
                view.input_mut().set_draft(line);
                if let Some(frame) = view.submit() {
                    renderer.store_changed(view.store());
                    forward(&mut channel, &frame, renderer).await;
                }
            }
            LoopEvent::Input(Some(InputEvent::Reload)) => break Ok(ChatExit::Reload),
            LoopEvent::Input(Some(InputEvent::Quit) | None) => break Ok(ChatExit::Quit),
        }
    };

    if opening.take().is_some() {
        debug!("chat: handshake abandoned");
    }
    if let Some(channel) = channel.take() {
        channel.close().await;
    }
    view.unmount();
    renderer.phase_changed(view.phase());

    let exit = result?;
    info!(?exit, "chat: unmounted");
    Ok(ChatOutcome { exit, view, channel_opened })
}

/// Start the handshake for `session_id`. The returned future is polled by the
/// loop alongside input, so an unmount can drop it mid-handshake.
fn open_channel(config: &ClientConfig, session_id: &str) -> Opening {
    let url = config.ws_url(session_id);
    async move { RealtimeChannel::open(&url).await }.boxed_local()
}

async fn next_opened(opening: &mut Option<Opening>) -> Result<RealtimeChannel, ClientError> {
    match opening.as_mut() {
        Some(opening) => opening.await,
        None => std::future::pending().await,
    }
}

async fn next_channel_event(channel: Option<&mut RealtimeChannel>) -> ChannelEvent {
    match channel {
        Some(channel) => channel.next_event().await,
        None => std::future::pending().await,
    }
}

async fn forward<R: Render>(channel: &mut Option<RealtimeChannel>, frame: &ClientFrame, renderer: &mut R) {
    let Some(open) = channel.as_mut() else {
        debug!("chat: no channel, message not sent");
        return;
    };
    if let Err(error) = open.send(frame).await {
        warn!(%error, "chat: send failed");
        renderer.notice(&format!("message not delivered: {error}"));
        *channel = None;
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
