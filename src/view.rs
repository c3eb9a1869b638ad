//! Chat view state machine.
//!
//! DESIGN
//! ======
//! `ChatView` owns everything one mounted chat screen needs: the transcript,
//! the draft, the lifecycle phase, and the published session. It performs no
//! I/O. The event loop in `chat.rs` drives it and owns the socket.
//!
//! PHASES
//! ======
//! ```text
//! NoSession --mount--> SessionPending --publish_session + channel_opened--> Connected
//!      any --unmount--> Closed
//! ```
//! A session is published at most once per mount. Transitions that do not
//! fit the diagram return `TransitionError` and leave the view unchanged.

use std::fmt;

use frames::ClientFrame;

use crate::input::InputController;
use crate::session::{Session, SessionId};
use crate::store::{ConversationStore, Message};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatPhase {
    /// Not mounted yet.
    NoSession,
    /// Mounted; session creation in flight or failed.
    SessionPending,
    /// Session published and channel open.
    Connected(SessionId),
    /// Unmounted.
    Closed,
}

impl ChatPhase {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoSession => "no-session",
            Self::SessionPending => "session-pending",
            Self::Connected(_) => "connected",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ChatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lifecycle event that is not valid in the current phase.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot {event} while {from}")]
pub struct TransitionError {
    pub from: &'static str,
    pub event: &'static str,
}

#[derive(Debug)]
pub struct ChatView {
    phase: ChatPhase,
    session: Option<Session>,
    store: ConversationStore,
    input: InputController,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: ChatPhase::NoSession,
            session: None,
            store: ConversationStore::new(),
            input: InputController::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> &ChatPhase {
        &self.phase
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    #[must_use]
    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputController {
        &mut self.input
    }

    fn reject(&self, event: &'static str) -> TransitionError {
        TransitionError { from: self.phase.name(), event }
    }

    /// # Errors
    ///
    /// Fails unless the view is in `NoSession`.
    pub fn mount(&mut self) -> Result<(), TransitionError> {
        if self.phase != ChatPhase::NoSession {
            return Err(self.reject("mount"));
        }
        self.phase = ChatPhase::SessionPending;
        Ok(())
    }

    /// Record the session returned by the initializer and return its id.
    ///
    /// # Errors
    ///
    /// Fails outside `SessionPending`, or when a session was already published.
    pub fn publish_session(&mut self, session: Session) -> Result<&SessionId, TransitionError> {
        if self.phase != ChatPhase::SessionPending || self.session.is_some() {
            return Err(self.reject("publish session"));
        }
        Ok(&self.session.insert(session).id)
    }

    /// # Errors
    ///
    /// Fails unless a session is published and the view is still pending.
    pub fn channel_opened(&mut self) -> Result<(), TransitionError> {
        let Some(session) = self.session.as_ref().filter(|_| self.phase == ChatPhase::SessionPending) else {
            return Err(self.reject("open channel"));
        };
        self.phase = ChatPhase::Connected(session.id.clone());
        Ok(())
    }

    /// Enter `Closed`. Idempotent.
    pub fn unmount(&mut self) {
        self.phase = ChatPhase::Closed;
    }

    /// Append one assistant message surfaced by the channel.
    pub fn receive(&mut self, content: impl Into<String>) {
        self.store.append(Message::assistant(content));
    }

    /// Submit the current draft. On acceptance the raw text is appended as a
    /// user message and the outbound frame is returned; the caller sends it
    /// if a channel is open. Appending does not wait on delivery.
    pub fn submit(&mut self) -> Option<ClientFrame> {
        let text = self.input.submit()?;
        self.store.append(Message::user(text.clone()));
        Some(ClientFrame::new(text))
    }

    #[must_use]
    pub fn into_store(self) -> ConversationStore {
        self.store
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
