//! Rendering seam for the chat view.
//!
//! The event loop reports lifecycle and transcript changes through `Render`.
//! `TerminalRenderer` prints them as plain lines; tests plug in recorders.

use std::io::Write;

use tracing::debug;

use crate::store::{ConversationStore, Message, Role};
use crate::view::ChatPhase;

pub const TITLE: &str = "Lu — Loan Sales Assistant";
pub const HINT: &str = "Type a message and press Enter. /reload starts a new session, /quit exits.";

pub trait Render {
    /// The view was mounted.
    fn mounted(&mut self) {}

    fn phase_changed(&mut self, _phase: &ChatPhase) {}

    /// The transcript changed. Entries are append-only.
    fn store_changed(&mut self, store: &ConversationStore);

    /// A one-off status line that is not part of the transcript.
    fn notice(&mut self, _text: &str) {}
}

/// Line-oriented renderer. Prints each transcript entry once.
pub struct TerminalRenderer<W: Write> {
    out: W,
    printed: usize,
    write_failed: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, printed: 0, write_failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Whether any write to the terminal has failed.
    #[must_use]
    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    fn line(&mut self, text: &str) {
        let written = writeln!(self.out, "{text}").and_then(|()| self.out.flush());
        if let Err(error) = written {
            if !self.write_failed {
                debug!(%error, "render: terminal write failed");
            }
            self.write_failed = true;
        }
    }
}

impl<W: Write> Render for TerminalRenderer<W> {
    fn mounted(&mut self) {
        self.printed = 0;
        self.line(TITLE);
        self.line(HINT);
    }

    fn phase_changed(&mut self, phase: &ChatPhase) {
        let text = match phase {
            ChatPhase::NoSession => return,
            ChatPhase::SessionPending => "· starting session".to_owned(),
            ChatPhase::Connected(id) => format!("· connected (session {id})"),
            ChatPhase::Closed => "· closed".to_owned(),
        };
        self.line(&text);
    }

    fn store_changed(&mut self, store: &ConversationStore) {
        let fresh: Vec<String> = store.since(self.printed).iter().map(format_entry).collect();
        self.printed = store.len();
        for entry in fresh {
            self.line(&entry);
        }
    }

    fn notice(&mut self, text: &str) {
        self.line(&format!("! {text}"));
    }
}

/// One transcript entry as terminal text. Continuation lines are indented
/// under the first.
#[must_use]
pub fn format_entry(message: &Message) -> String {
    let label = match message.role() {
        Role::User => "you ›",
        Role::Assistant => "lu  ›",
    };
    let indent = " ".repeat(label.chars().count() + 1);
    let mut lines = message.content().lines();
    let first = lines.next().unwrap_or_default();
    let mut out = format!("{label} {first}");
    for rest in lines {
        out.push('\n');
        out.push_str(&indent);
        out.push_str(rest);
    }
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
